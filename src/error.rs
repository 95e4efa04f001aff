use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Required column '{column}' not found in dataset")]
    MissingColumn { column: String },

    #[error("Dataset has no columns")]
    NoColumns,

    #[error(transparent)]
    Load(#[from] anyhow::Error),
}

pub type DatasetResult<T> = Result<T, DatasetError>;
