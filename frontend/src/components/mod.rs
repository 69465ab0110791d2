pub mod map_component;
pub mod notice;
pub mod workout_form;
pub mod workout_list;
