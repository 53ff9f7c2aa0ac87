/// Port trait definitions (interfaces)
///
/// These traits define the contracts for adapters to implement.
/// Following the ports-and-adapters (hexagonal) architecture pattern.
pub mod llm;
pub mod notifier;
pub mod storage;

pub use llm::{LlmConfig, LlmServicePort};
pub use notifier::NotifierPort;
pub use storage::{StorageLimits, StoragePort, MAX_MEETINGS, MAX_TASKS};
