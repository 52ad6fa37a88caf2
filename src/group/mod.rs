pub mod group_dto;
pub mod group_handlers;
pub mod group_models;
pub mod group_repository;
pub mod group_service;
