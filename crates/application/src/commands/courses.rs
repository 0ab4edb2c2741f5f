use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use courselib_core::{Course, CourseDetails, CourseId, Repository};

use crate::request::impl_command;
use crate::{DispatchError, Handler};

#[derive(Debug, Clone)]
pub struct CreateCourse {
    pub details: CourseDetails,
}

impl_command!(CreateCourse => CourseId, "courses.create");

#[derive(Debug, Clone)]
pub struct UpdateCourse {
    pub id: CourseId,
    pub details: CourseDetails,
}

impl_command!(UpdateCourse => (), "courses.update");

#[derive(Debug, Clone)]
pub struct DeleteCourse {
    pub id: CourseId,
}

impl_command!(DeleteCourse => (), "courses.delete");

pub struct CreateCourseHandler {
    courses: Arc<dyn Repository<Course>>,
}

impl CreateCourseHandler {
    pub fn new(courses: Arc<dyn Repository<Course>>) -> Self {
        Self { courses }
    }
}

#[async_trait]
impl Handler<CreateCourse> for CreateCourseHandler {
    async fn handle(&self, command: CreateCourse) -> Result<CourseId, DispatchError> {
        let course = Course::create(CourseId::new(), command.details, Utc::now())?;
        let id = course.id;
        self.courses.save(course).await?;
        tracing::info!(course_id = %id, "course created");
        Ok(id)
    }
}

pub struct UpdateCourseHandler {
    courses: Arc<dyn Repository<Course>>,
}

impl UpdateCourseHandler {
    pub fn new(courses: Arc<dyn Repository<Course>>) -> Self {
        Self { courses }
    }
}

#[async_trait]
impl Handler<UpdateCourse> for UpdateCourseHandler {
    async fn handle(&self, command: UpdateCourse) -> Result<(), DispatchError> {
        let Some(mut course) = self.courses.find(&command.id).await? else {
            return Err(DispatchError::not_found("course", command.id));
        };
        course.revise(command.details, Utc::now())?;
        self.courses.save(course).await?;
        Ok(())
    }
}

pub struct DeleteCourseHandler {
    courses: Arc<dyn Repository<Course>>,
}

impl DeleteCourseHandler {
    pub fn new(courses: Arc<dyn Repository<Course>>) -> Self {
        Self { courses }
    }
}

#[async_trait]
impl Handler<DeleteCourse> for DeleteCourseHandler {
    async fn handle(&self, command: DeleteCourse) -> Result<(), DispatchError> {
        if self.courses.delete(&command.id).await? {
            tracing::info!(course_id = %command.id, "course deleted");
            Ok(())
        } else {
            Err(DispatchError::not_found("course", command.id))
        }
    }
}
