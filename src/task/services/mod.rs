//! Application services for task requests.

mod tasks;

pub use tasks::{CreateTaskRequest, TaskDetail, TaskService, TaskServiceError, TaskServiceResult};
