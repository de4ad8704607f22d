pub mod donate;
pub mod edit_roles;
pub mod help;
pub mod home;
pub mod new_scene;
pub mod rehearsal;
