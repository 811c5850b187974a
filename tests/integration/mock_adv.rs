//! Mock advertiser for integration tests.

use blehub::gap::AdvertiserPort;

/// Records every restart request instead of touching a radio.
#[derive(Debug, Default)]
pub struct MockAdvertiser {
    pub restarts: usize,
}

impl AdvertiserPort for MockAdvertiser {
    fn restart(&mut self) {
        self.restarts += 1;
    }
}
