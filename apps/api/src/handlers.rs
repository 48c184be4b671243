pub mod admin_menu;
pub mod field_groups;
pub mod health;
pub mod hooks;
pub mod roles;
pub mod settings;
