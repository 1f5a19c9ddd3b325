use parking_lot::Mutex;

use super::Publish;
use crate::object::{AtmosphereReading, Fusable};

/// The single pressure reading. Its sentence is republished every cycle.
pub struct AtmosphereStore {
    reading: Mutex<AtmosphereReading>,
    publish: Publish<AtmosphereReading>,
}

impl AtmosphereStore {
    pub fn new<F>(fallback: AtmosphereReading, publish: F) -> Self
    where
        F: Fn(&AtmosphereReading, &str) + Send + Sync + 'static,
    {
        Self {
            reading: Mutex::new(fallback),
            publish: Box::new(publish),
        }
    }

    pub fn update(&self, reading: AtmosphereReading) -> bool {
        self.reading.lock().try_update(reading)
    }

    pub fn pressure(&self) -> f64 {
        self.reading.lock().pressure()
    }

    pub fn access(&self) {
        let mut guard = self.reading.lock();
        guard.age();
        let reading: &AtmosphereReading = &guard;
        (self.publish)(reading, reading.sentence());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex as StdMutex};

    #[test]
    fn republishes_last_sentence() {
        let seen = Arc::new(StdMutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let store = AtmosphereStore::new(AtmosphereReading::default(), move |_, s| {
            sink.lock().unwrap().push(s.to_string())
        });
        assert!(store.update(AtmosphereReading::new(0, 1009.0, "$WIMDA,x*00").unwrap()));
        store.access();
        store.access();
        assert_eq!(*seen.lock().unwrap(), vec!["$WIMDA,x*00", "$WIMDA,x*00"]);
        assert_eq!(store.pressure(), 1009.0);
    }
}
