//! Telemetry handoff from an ingestion thread to the render loop.
//!
//! `TelemetryPump` owns a `TelemetrySource` on a background thread and
//! pushes samples through a bounded channel. `Dispatcher` runs on the thread
//! that owns the visuals: it drains samples, interpolates them through the
//! bound tables and hands `GaugeUpdate`s to a `RenderSink`.
//!
//! Each `TelemetryPump` spawns exactly one thread, shut down on drop.
use crossbeam_channel as xch;
use helios_traits::{GaugeUpdate, RenderSink, TelemetrySample, TelemetrySource};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{RegistryError, Result};
use crate::registry::{GaugeBindings, TableRegistry};

pub struct TelemetryPump {
    rx: xch::Receiver<TelemetrySample>,
    shutdown: Arc<AtomicBool>,
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl TelemetryPump {
    /// Spawn the ingestion thread. `capacity` bounds the number of samples
    /// in flight; the source blocks when the render loop falls behind.
    pub fn spawn<S: TelemetrySource + Send + 'static>(mut source: S, capacity: usize) -> Self {
        let (tx, rx) = xch::bounded(capacity.max(1));
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let join_handle = std::thread::spawn(move || {
            loop {
                if shutdown_clone.load(Ordering::Relaxed) {
                    tracing::debug!("telemetry pump received shutdown signal");
                    break;
                }
                match source.next_sample() {
                    Ok(Some(sample)) => {
                        // Consumer gone; nothing left to feed
                        if tx.send(sample).is_err() {
                            tracing::debug!("telemetry consumer disconnected, exiting thread");
                            break;
                        }
                    }
                    Ok(None) => {
                        tracing::debug!("telemetry source exhausted");
                        break;
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "telemetry source error; skipping sample");
                    }
                }
            }
            tracing::trace!("telemetry pump thread exiting cleanly");
        });

        Self {
            rx,
            shutdown,
            join_handle: Some(join_handle),
        }
    }

    /// Samples already queued, without blocking.
    pub fn try_iter(&self) -> xch::TryIter<'_, TelemetrySample> {
        self.rx.try_iter()
    }

    /// Block for the next sample; `None` once the source is exhausted.
    pub fn recv(&self) -> Option<TelemetrySample> {
        self.rx.recv().ok()
    }
}

impl Drop for TelemetryPump {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        // Disconnect so a producer blocked on a full channel wakes up
        drop(std::mem::replace(&mut self.rx, xch::never()));
        if let Some(handle) = self.join_handle.take() {
            match handle.join() {
                Ok(()) => tracing::trace!("telemetry pump joined"),
                Err(e) => tracing::warn!(?e, "telemetry pump thread panicked during shutdown"),
            }
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchStats {
    /// Samples seen.
    pub samples: u64,
    /// Updates handed to the sink.
    pub updates: u64,
    /// Samples no gauge listens to.
    pub unbound: u64,
    /// Samples dropped for a non-finite value.
    pub dropped: u64,
}

pub struct Dispatcher<R: RenderSink> {
    registry: TableRegistry,
    bindings: GaugeBindings,
    sink: R,
    stats: DispatchStats,
}

impl<R: RenderSink> Dispatcher<R> {
    /// Fails when a binding names a table missing from `registry`.
    pub fn new(registry: TableRegistry, bindings: GaugeBindings, sink: R) -> Result<Self> {
        bindings.check_tables(&registry)?;
        Ok(Self {
            registry,
            bindings,
            sink,
            stats: DispatchStats::default(),
        })
    }

    /// Route one sample to its gauges. Returns the number of updates emitted.
    pub fn dispatch(&mut self, sample: &TelemetrySample) -> Result<usize> {
        self.stats.samples += 1;
        if !sample.value.is_finite() {
            self.stats.dropped += 1;
            tracing::warn!(
                device = %sample.device,
                element = %sample.element,
                value = sample.value,
                "dropping non-finite telemetry value"
            );
            return Ok(0);
        }
        let bindings = self.bindings.lookup(&sample.device, &sample.element);
        if bindings.is_empty() {
            self.stats.unbound += 1;
            tracing::trace!(device = %sample.device, element = %sample.element, "unbound telemetry");
            return Ok(0);
        }
        for b in bindings {
            let table = self
                .registry
                .get(&b.table)
                .ok_or_else(|| RegistryError::UnknownTable(b.table.clone()))?;
            let update = GaugeUpdate {
                gauge: b.gauge.clone(),
                value: sample.value,
                output: table.interpolate(sample.value),
            };
            tracing::trace!(gauge = %update.gauge, value = update.value, output = update.output, "gauge update");
            self.sink
                .apply(&update)
                .map_err(|e| eyre::eyre!("render sink rejected update for '{}': {e}", b.gauge))?;
            self.stats.updates += 1;
        }
        Ok(bindings.len())
    }

    /// Dispatch everything currently queued without blocking.
    pub fn drain(&mut self, pump: &TelemetryPump) -> Result<usize> {
        let mut n = 0;
        for sample in pump.try_iter() {
            n += self.dispatch(&sample)?;
        }
        Ok(n)
    }

    /// Dispatch until the pump's source is exhausted.
    pub fn run(&mut self, pump: &TelemetryPump) -> Result<DispatchStats> {
        while let Some(sample) = pump.recv() {
            self.dispatch(&sample)?;
        }
        tracing::debug!(stats = ?self.stats, "telemetry replay finished");
        Ok(self.stats)
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    pub fn registry(&self) -> &TableRegistry {
        &self.registry
    }

    pub fn sink(&self) -> &R {
        &self.sink
    }

    pub fn into_sink(self) -> R {
        self.sink
    }
}
