/// Events emitted by navigation, consumed by the audio layer and logs.

use crate::domain::stage::Stage;
use crate::sim::nav::Direction;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TourEvent {
    StageChanged { from: Stage, to: Stage, direction: Direction },
    /// A navigation request at a boundary stage. The state did not change.
    Bumped { at: Stage, direction: Direction },
    /// Arrived at the final stage.
    GameClear,
}
