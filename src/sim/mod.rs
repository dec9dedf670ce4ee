pub mod event;
pub mod nav;
pub mod schedule;
pub mod starfield;
pub mod transition;
pub mod world;
