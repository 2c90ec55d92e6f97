pub(crate) mod context;
pub(crate) mod pipeline;

pub(crate) use context::GpuContext;
pub(crate) use pipeline::FractalPipeline;
