mod plan;
mod scheduled_post;
mod user;
