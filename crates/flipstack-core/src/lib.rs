#![forbid(unsafe_code)]

//! Core: the gesture-to-progress state machine behind a flippable card stack.
//!
//! # Role in flipstack
//! `flipstack-core` turns a stream of vertical drag samples into a position in
//! a stack of cards plus a continuous sub-progress, and tells an animation
//! driver what each card should look like. It does not render anything.
//!
//! # Primary responsibilities
//! - **FlipSession**: the per-screen context object; owns cumulative progress.
//! - **ProgressTracker**: per-sample, sensitivity-normalized progress deltas.
//! - **IndexResolver**: active card and local progress from cumulative progress.
//! - **CompletionDecider**: finish or cancel at gesture end.
//! - **AnimationDriver**: the contract renderers implement; `SpringAnimator`
//!   is a spring-physics reference implementation.
//!
//! # How it fits in the system
//! A platform layer (or `PanRecognizer`) feeds `PanEvent`s into a
//! `FlipSession`, passing its driver along with each call. The driver applies
//! immediate visuals during the drag and runs spring animations when the
//! gesture settles. `flipstack-demo` wires all of this together headlessly.

pub mod animation;
pub mod animator;
pub mod card;
pub mod completion;
pub mod config;
pub mod driver;
pub mod geometry;
pub mod gesture;
pub mod progress;
pub mod resolver;
pub mod session;
pub mod visual;

pub use animator::{CardSnapshot, SpringAnimator};
pub use card::{Card, CardStack, StackError, StackLayout};
pub use completion::{CardState, Completion, CompletionDecider, PanDirection};
pub use config::{ConfigError, FlipConfig};
pub use driver::{AnimationDriver, DriverCommand, RecordingDriver, SpringSpec};
pub use geometry::{Point, Rect, Size, Velocity};
pub use gesture::{PanEvent, PanRecognizer, PointerPhase};
pub use session::{FlipSession, LiveUpdate, SessionOutput, Settlement};
pub use visual::{CardVisual, Matrix4};
