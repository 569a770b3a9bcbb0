pub mod in_memory_event_store;
pub mod scylla_event_store;
