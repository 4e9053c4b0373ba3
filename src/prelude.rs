pub use crate::data_structs::{
    Edge,
    EdgeKind,
    LayerShape,
    Layers,
    NetworkResult,
    Penalty,
    Significance,
    StandardizedMatrix,
};
pub use crate::error::{
    NetError,
    Result,
};
pub use crate::io::{
    load_matrix,
    save_matrix,
};
pub use crate::tools::pipeline::{
    OutputPaths,
    Pipeline,
    PipelineConfig,
    RunMode,
    RunSummary,
};
pub use crate::tools::shrinkage::{
    PadjMethod,
    ShrinkageEstimator,
};
pub use crate::tools::NetworkEstimator;
pub use crate::utils::standardize;
