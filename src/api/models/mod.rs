pub mod workouts;

pub use workouts::{CreateWorkoutRequest, UpdateWorkoutRequest, WorkoutResponse};
