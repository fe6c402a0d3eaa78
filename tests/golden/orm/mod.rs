// Hand-owned module root of the checked-in generated tree.

pub mod default_manager;
pub mod default_repository;
pub mod dynamic_entity_manager;
pub mod dynamic_managers;
pub mod dynamic_repositories;
