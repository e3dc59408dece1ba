use std::path::PathBuf;

/// Fatal problems with the layout of the export directory
#[derive(Debug, thiserror::Error)]
pub enum StructureError {
    #[error("Could not find a jsons folder in {0} => make sure you selected the export directory")]
    MissingJsonsFolder(PathBuf),
    #[error("Could not find the exercise csv (com.samsung.shealth.exercise.2*) in {0} => make sure you selected the export directory")]
    MissingLedger(PathBuf),
    #[error("Could not find the exercise sample folder {0}")]
    MissingSampleRoot(PathBuf),
}

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Could not read exercise csv {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed exercise csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("Exercise csv has no header line")]
    MissingHeader,
    #[error("Exercise csv is missing required column '{0}'")]
    MissingColumn(&'static str),
}

#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    #[error("Could not read sample file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid sample file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("I/O error while writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("XML error while writing {path}: {source}")]
    Xml {
        path: PathBuf,
        #[source]
        source: quick_xml::Error,
    },
    #[error("Timestamp {0} ms cannot be represented in local time")]
    Timestamp(i64),
}

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error(transparent)]
    Structure(#[from] StructureError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("Could not index sample files: {0}")]
    Index(#[from] walkdir::Error),
    #[error("Could not build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
