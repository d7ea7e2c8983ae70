//! Live preview coalescing. Slider drags submit faster than effects
//! process; the worker debounces briefly, drains the queue, and renders
//! only the newest request. `latest` enforces last-write-wins so a slow
//! early render can never overwrite a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crate::buffer::RasterBuffer;
use crate::effect::AppliedEffect;
use crate::engine;
use crate::registry::EffectRegistry;

/// Quiescence window before the worker renders. Long enough to swallow a
/// burst of slider events, short enough to feel live.
const DEBOUNCE_WINDOW: Duration = Duration::from_millis(30);

struct Job {
    generation: u64,
    applied: AppliedEffect,
}

/// Background preview worker over one immutable base buffer.
pub struct Previewer {
    sender: Option<mpsc::Sender<Job>>,
    worker: Option<thread::JoinHandle<()>>,
    generation: Arc<AtomicU64>,
    result: Arc<Mutex<Option<(u64, RasterBuffer)>>>,
}

impl Previewer {
    /// Spawn the worker. It carries its own copy of the base buffer and
    /// holds no other state across requests.
    pub fn spawn(registry: Arc<EffectRegistry>, base: RasterBuffer) -> Self {
        let (sender, receiver) = mpsc::channel::<Job>();
        let generation = Arc::new(AtomicU64::new(0));
        let result: Arc<Mutex<Option<(u64, RasterBuffer)>>> = Arc::new(Mutex::new(None));

        let result_slot = Arc::clone(&result);
        let worker = thread::spawn(move || {
            while let Ok(first) = receiver.recv() {
                let mut newest = first;
                // Debounce: keep draining until the channel stays quiet
                // for a full window, then render only the newest job.
                loop {
                    match receiver.recv_timeout(DEBOUNCE_WINDOW) {
                        Ok(job) => newest = job,
                        Err(RecvTimeoutError::Timeout) => break,
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                match engine::preview(&registry, &base, &newest.applied) {
                    Ok(rendered) => {
                        let mut slot = result_slot.lock().expect("preview result lock");
                        *slot = Some((newest.generation, rendered));
                    }
                    Err(err) => {
                        tracing::warn!(
                            effect_id = %newest.applied.effect_id,
                            error = %err,
                            "preview render failed"
                        );
                    }
                }
            }
        });

        Self {
            sender: Some(sender),
            worker: Some(worker),
            generation,
            result,
        }
    }

    /// Queue a preview request, stamping it with the next generation.
    /// Returns the generation for callers that want to correlate.
    pub fn submit(&self, applied: AppliedEffect) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(sender) = &self.sender {
            // Send only fails if the worker died; the next latest() call
            // simply never sees a newer result.
            let _ = sender.send(Job {
                generation,
                applied,
            });
        }
        generation
    }

    /// Take the newest rendered preview, if it corresponds to the newest
    /// submitted request. Stale results are discarded, not returned.
    pub fn latest(&self) -> Option<RasterBuffer> {
        let newest = self.generation.load(Ordering::SeqCst);
        let mut slot = self.result.lock().expect("preview result lock");
        match slot.take() {
            Some((generation, rendered)) if generation == newest => Some(rendered),
            Some((generation, _)) => {
                tracing::warn!(generation, newest, "discarding stale preview");
                None
            }
            None => None,
        }
    }

    /// True once every submitted request has either rendered or been
    /// superseded and the newest result is waiting.
    pub fn has_latest(&self) -> bool {
        let newest = self.generation.load(Ordering::SeqCst);
        let slot = self.result.lock().expect("preview result lock");
        matches!(&*slot, Some((generation, _)) if *generation == newest)
    }
}

impl Drop for Previewer {
    fn drop(&mut self) {
        // Closing the channel ends the worker loop.
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
