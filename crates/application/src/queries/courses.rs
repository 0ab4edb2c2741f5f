use std::sync::Arc;

use async_trait::async_trait;

use courselib_core::{Course, CourseId, Repository};

use crate::request::impl_query;
use crate::{CourseDto, DispatchError, Handler};

#[derive(Debug, Clone)]
pub struct GetCourse {
    pub id: CourseId,
}

impl_query!(GetCourse => CourseDto, "courses.get");

#[derive(Debug, Clone, Default)]
pub struct GetCourses;

impl_query!(GetCourses => Vec<CourseDto>, "courses.list");

pub struct GetCourseHandler {
    courses: Arc<dyn Repository<Course>>,
}

impl GetCourseHandler {
    pub fn new(courses: Arc<dyn Repository<Course>>) -> Self {
        Self { courses }
    }
}

#[async_trait]
impl Handler<GetCourse> for GetCourseHandler {
    async fn handle(&self, query: GetCourse) -> Result<CourseDto, DispatchError> {
        self.courses
            .find(&query.id)
            .await?
            .map(|course| CourseDto::from(&course))
            .ok_or_else(|| DispatchError::not_found("course", query.id))
    }
}

pub struct GetCoursesHandler {
    courses: Arc<dyn Repository<Course>>,
}

impl GetCoursesHandler {
    pub fn new(courses: Arc<dyn Repository<Course>>) -> Self {
        Self { courses }
    }
}

#[async_trait]
impl Handler<GetCourses> for GetCoursesHandler {
    async fn handle(&self, _query: GetCourses) -> Result<Vec<CourseDto>, DispatchError> {
        Ok(self.courses.list().await?.iter().map(CourseDto::from).collect())
    }
}
