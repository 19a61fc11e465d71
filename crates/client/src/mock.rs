//! In-process [`ShopApi`] for session tests.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use lesson_shop_core::{Lesson, LessonId, NewOrder, OrderId, Price};

use crate::api::{ClientError, ShopApi};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    Search(String),
    UpdateSpaces(LessonId, u32),
    CreateOrder(NewOrder),
}

#[derive(Default)]
struct MockState {
    lessons: BTreeMap<LessonId, Lesson>,
    calls: Vec<Call>,
    fail_orders: bool,
    fail_updates: bool,
    fail_reads: bool,
    failing_updates: BTreeSet<LessonId>,
    update_delays: BTreeMap<LessonId, Duration>,
}

#[derive(Default)]
pub struct MockApi {
    state: Mutex<MockState>,
}

fn server_error() -> ClientError {
    ClientError::Status {
        status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        body: "internal server error".to_owned(),
    }
}

impl MockApi {
    pub fn with_lessons(lessons: impl IntoIterator<Item = Lesson>) -> Self {
        let api = Self::default();
        api.state.lock().unwrap().lessons = lessons.into_iter().map(|l| (l.id, l)).collect();
        api
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn lesson(&self, id: LessonId) -> Lesson {
        self.state.lock().unwrap().lessons[&id].clone()
    }

    /// Change a lesson behind the session's back, as another customer would.
    pub fn set_spaces(&self, id: LessonId, spaces: u32) {
        self.state.lock().unwrap().lessons.get_mut(&id).unwrap().spaces = spaces;
    }

    pub fn fail_orders(&self, fail: bool) {
        self.state.lock().unwrap().fail_orders = fail;
    }

    pub fn fail_updates(&self, fail: bool) {
        self.state.lock().unwrap().fail_updates = fail;
    }

    pub fn fail_reads(&self, fail: bool) {
        self.state.lock().unwrap().fail_reads = fail;
    }

    /// Make updates of one lesson fail.
    pub fn fail_update_of(&self, id: LessonId) {
        self.state.lock().unwrap().failing_updates.insert(id);
    }

    /// Hold updates of one lesson for `delay` before answering.
    pub fn delay_update(&self, id: LessonId, delay: Duration) {
        self.state.lock().unwrap().update_delays.insert(id, delay);
    }
}

#[async_trait]
impl ShopApi for MockApi {
    async fn list_lessons(&self) -> Result<Vec<Lesson>, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::List);
        if state.fail_reads {
            return Err(server_error());
        }
        Ok(state.lessons.values().cloned().collect())
    }

    async fn search_lessons(&self, text: &str) -> Result<Vec<Lesson>, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Search(text.to_owned()));
        if state.fail_reads {
            return Err(server_error());
        }
        Ok(state
            .lessons
            .values()
            .filter(|l| l.matches(text))
            .cloned()
            .collect())
    }

    async fn update_spaces(&self, id: LessonId, spaces: u32) -> Result<Lesson, ClientError> {
        let delay = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(Call::UpdateSpaces(id, spaces));
            state.update_delays.get(&id).copied()
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.lock().unwrap();
        if state.fail_updates || state.failing_updates.contains(&id) {
            return Err(server_error());
        }
        let lesson = state.lessons.get_mut(&id).ok_or(ClientError::Status {
            status: reqwest::StatusCode::NOT_FOUND,
            body: "not found".to_owned(),
        })?;
        lesson.spaces = spaces;
        Ok(lesson.clone())
    }

    async fn create_order(&self, order: &NewOrder) -> Result<OrderId, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::CreateOrder(order.clone()));
        if state.fail_orders {
            return Err(server_error());
        }
        Ok(OrderId::generate())
    }
}

pub fn lesson(subject: &str, location: &str, price: u32, spaces: u32) -> Lesson {
    Lesson {
        id: LessonId::generate(),
        subject: subject.to_owned(),
        location: location.to_owned(),
        price: Price::from_units(price),
        spaces,
        image: format!("{}.svg", subject.to_lowercase()),
    }
}
