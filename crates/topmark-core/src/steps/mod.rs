//! Pipeline steps
//!
//! A step reads whatever earlier steps left on the context, writes only
//! the status axes it declares in [`Step::axes_written`], and may request
//! a halt. Lower-level failures never escape a step: they become a status
//! value plus a diagnostic.

mod builder;
mod comparer;
mod patcher;
mod planner;
mod reader;
mod renderer;
mod resolver;
mod scanner;
mod sniffer;
mod stripper;
mod writer;

pub use builder::BuilderStep;
pub use comparer::ComparerStep;
pub use patcher::PatcherStep;
pub use planner::PlannerStep;
pub use reader::ReaderStep;
pub use renderer::RendererStep;
pub use resolver::ResolverStep;
pub use scanner::ScannerStep;
pub use sniffer::SnifferStep;
pub use stripper::StripperStep;
pub use writer::WriterStep;

use crate::context::{HintContext, ProcessingContext, StepContext};
use crate::status::Axis;

pub trait Step: Send + Sync {
    /// Short identifier used in diagnostics and halt records.
    fn name(&self) -> &'static str;

    /// The status axes this step is allowed to write.
    fn axes_written(&self) -> &'static [Axis];

    /// Whether the inputs this step depends on are in a usable state.
    /// A step that may not proceed is skipped and leaves its axes pending.
    fn may_proceed(&self, ctx: &ProcessingContext) -> bool;

    fn run(&self, ctx: &mut StepContext<'_>);

    /// Advisory callback. Runs after `run`, and also when the file has
    /// already halted.
    fn hint(&self, _ctx: &mut HintContext<'_>) {}
}
