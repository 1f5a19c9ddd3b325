use parking_lot::Mutex;

use super::Publish;
use crate::object::{Fusable, WindReading};

/// The single wind sentence. Cleared after each publish, so a cycle without
/// fresh input publishes nothing.
pub struct WindStore {
    reading: Mutex<WindReading>,
    publish: Publish<WindReading>,
}

impl WindStore {
    pub fn new<F>(publish: F) -> Self
    where
        F: Fn(&WindReading, &str) + Send + Sync + 'static,
    {
        Self {
            reading: Mutex::new(WindReading::default()),
            publish: Box::new(publish),
        }
    }

    pub fn update(&self, reading: WindReading) -> bool {
        self.reading.lock().try_update(reading)
    }

    pub fn access(&self) {
        let mut guard = self.reading.lock();
        guard.age();
        let reading: &WindReading = &guard;
        (self.publish)(reading, reading.sentence());
        guard.clear();
    }
}
