use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutlineError {
    /// The caller supplied no spans at all. This is the only hard failure
    /// in the pipeline; everything else degrades to a sparse result.
    #[error("document contains no text spans")]
    EmptyInput,
}
