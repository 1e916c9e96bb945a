pub mod account_repository;
pub mod entry_repository;
pub mod inventory_repository;
pub mod task_repository;

pub use account_repository::AccountRepository;
pub use entry_repository::EntryRepository;
pub use inventory_repository::InventoryRepository;
pub use task_repository::TaskRepository;
