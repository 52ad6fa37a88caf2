pub mod entry_dto;
pub mod entry_handlers;
pub mod entry_models;
pub mod entry_repository;
pub mod entry_service;
