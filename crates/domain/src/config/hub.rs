use serde::{Deserialize, Serialize};

/// What the resolution producer does when the hub queue is full
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionOverflow {
    /// Abandon the event; the DNS reply path never waits on the hub
    #[default]
    Drop,
    /// Wait for queue admission after the reply has been written
    Wait,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HubConfig {
    /// Pending messages the hub accepts before admission blocks or drops
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    #[serde(default)]
    pub resolution_overflow: ResolutionOverflow,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
            resolution_overflow: ResolutionOverflow::default(),
        }
    }
}

fn default_queue_capacity() -> usize {
    1
}
