pub mod activity_log;
pub mod article;
pub mod category;
pub mod message;
pub mod news;
pub mod report;
pub mod section;
pub mod setting;
pub mod user;

pub use activity_log::Entity as ActivityLog;
pub use article::Entity as Article;
pub use category::Entity as Category;
pub use message::Entity as Message;
pub use news::Entity as News;
pub use report::Entity as Report;
pub use section::Entity as Section;
pub use setting::Entity as Setting;
pub use user::Entity as User;
