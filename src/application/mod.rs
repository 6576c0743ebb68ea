// Application layer: request/report handling around the epoch pipeline

pub mod epoch_service;

pub use epoch_service::{close_epoch, EpochReport, EpochRequest};
