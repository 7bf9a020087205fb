//! Stratified dataset partitioning
//!
//! Splitting, N-way partitioning and sampling all stratify by the
//! (region, sensor) group so every sensor in every region stays
//! proportionally represented. The planners in `splitter` are pure; the
//! filesystem side effects live in `transfer`.

pub mod splitter;
pub mod transfer;

pub use splitter::{
    sample_by_ratio, split_into_n, train_test_split, SplitPlan, SHUFFLE_SEED,
};
pub use transfer::{TransferExecutor, TransferReport};
