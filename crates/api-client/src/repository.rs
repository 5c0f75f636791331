//! REST repository for one resource.
//!
//! | Operation | Request |
//! |---|---|
//! | list | `GET /{resource}` |
//! | get by id | `GET /{resource}/{id}` (`404` means no record) |
//! | create | `POST /{resource}` |
//! | update | `PUT /{resource}/{id}` |
//! | delete | `DELETE /{resource}/{id}` |

use crate::client::ApiClient;
use async_trait::async_trait;
use clinic_core::{Create, Delete, GetById, List, RepositoryError, RepositoryResult, Update};
use clinic_types::{Entity, Resource};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;

pub struct HttpRepository<T> {
    client: ApiClient,
    _resource: PhantomData<fn() -> T>,
}

impl<T> Clone for HttpRepository<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            _resource: PhantomData,
        }
    }
}

impl<T: Resource> HttpRepository<T> {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            _resource: PhantomData,
        }
    }

    fn item_path(id: i64) -> String {
        format!("{}/{}", T::RESOURCE, id)
    }
}

#[async_trait]
impl<T> List<T> for HttpRepository<T>
where
    T: Resource + DeserializeOwned,
{
    async fn list(&self) -> RepositoryResult<Vec<T>> {
        let body = self
            .client
            .send(Method::GET, T::RESOURCE)
            .await?
            .into_body()?;
        decode_rows(body)
    }
}

#[async_trait]
impl<E> GetById<E> for HttpRepository<E>
where
    E: Entity + DeserializeOwned,
{
    async fn get_by_id(&self, id: i64) -> RepositoryResult<Option<E>> {
        let reply = self.client.send(Method::GET, &Self::item_path(id)).await?;
        if reply.is_not_found() {
            return Ok(None);
        }
        decode_one(reply.into_body()?)
    }
}

#[async_trait]
impl<E> Create<E> for HttpRepository<E>
where
    E: Entity + Serialize + DeserializeOwned,
{
    async fn create(&self, payload: &E) -> RepositoryResult<Option<E>> {
        let body = self
            .client
            .send_json(Method::POST, E::RESOURCE, payload)
            .await?
            .into_body()?;
        decode_one(body)
    }
}

#[async_trait]
impl<E> Update<E> for HttpRepository<E>
where
    E: Entity + Serialize + DeserializeOwned,
{
    async fn update(&self, id: i64, payload: &E) -> RepositoryResult<Option<E>> {
        let body = self
            .client
            .send_json(Method::PUT, &Self::item_path(id), payload)
            .await?
            .into_body()?;
        decode_one(body)
    }
}

#[async_trait]
impl<E> Delete<E> for HttpRepository<E>
where
    E: Entity,
{
    async fn delete(&self, id: i64) -> RepositoryResult<()> {
        self.client
            .send(Method::DELETE, &Self::item_path(id))
            .await?
            .into_body()?;
        Ok(())
    }
}

/// Decodes a list body row by row. Entries that are not JSON objects are skipped.
fn decode_rows<T: Resource + DeserializeOwned>(body: Option<Value>) -> RepositoryResult<Vec<T>> {
    match body {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(rows)) => Ok(rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value::<T>(row) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!("skipping undecodable {}: {}", T::SINGULAR, e);
                    None
                }
            })
            .collect()),
        Some(_) => Err(RepositoryError::Decode(format!(
            "expected a list of {}",
            T::PLURAL
        ))),
    }
}

/// Decodes a single-record body; an empty body means "no record".
fn decode_one<T: DeserializeOwned>(body: Option<Value>) -> RepositoryResult<Option<T>> {
    match body {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| RepositoryError::Decode(e.to_string())),
    }
}
