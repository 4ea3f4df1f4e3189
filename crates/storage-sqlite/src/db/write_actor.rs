//! Single-writer actor.
//!
//! SQLite allows one writer at a time; instead of letting request tasks
//! contend for the write lock, all mutations are funneled through one
//! background task that owns a dedicated connection and runs each job in
//! an immediate transaction. The holdings sync relies on this: replacing a
//! fund's holdings and allocation rows is one job, so readers see either
//! the old pair or the new pair, never a mix.

use std::any::Any;
use std::sync::Arc;

use diesel::{Connection, SqliteConnection};
use fundpulse_core::errors::Result;
use log::error;
use tokio::sync::{mpsc, oneshot};

use super::DbPool;
use crate::errors::StorageError;

// A write job: runs against the actor's connection, result type-erased so
// one channel carries jobs of any return type.
type Job = Box<dyn FnOnce(&mut SqliteConnection) -> Result<Box<dyn Any + Send>> + Send + 'static>;
type Reply = oneshot::Sender<Result<Box<dyn Any + Send>>>;

/// Handle for sending write jobs to the writer actor.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::Sender<(Job, Reply)>,
}

impl WriteHandle {
    /// Executes a database job on the writer's dedicated connection, inside
    /// an immediate transaction.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static + Any,
    {
        let (ret_tx, ret_rx) = oneshot::channel();

        self.tx
            .send((
                Box::new(move |conn| job(conn).map(|v| Box::new(v) as Box<dyn Any + Send>)),
                ret_tx,
            ))
            .await
            .map_err(|_| StorageError::CoreError("writer actor stopped".to_string()))?;

        let boxed = ret_rx
            .await
            .map_err(|_| StorageError::CoreError("writer actor dropped the reply".to_string()))??;

        boxed
            .downcast::<T>()
            .map(|v| *v)
            .map_err(|_| StorageError::CoreError("writer actor result type mismatch".into()).into())
    }
}

/// Spawns the writer actor. It checks out one connection from the pool and
/// processes jobs serially until every `WriteHandle` is dropped.
pub fn spawn_writer(pool: Arc<DbPool>) -> WriteHandle {
    let (tx, mut rx) = mpsc::channel::<(Job, Reply)>(1024);

    tokio::spawn(async move {
        let mut conn = match pool.get() {
            Ok(conn) => conn,
            Err(e) => {
                error!("writer actor could not acquire a connection: {}", e);
                return;
            }
        };

        while let Some((job, reply_tx)) = rx.recv().await {
            let result = conn
                .immediate_transaction::<_, StorageError, _>(|c| job(c).map_err(StorageError::from))
                .map_err(|e: StorageError| e.into());

            // Receiver may have gone away (request cancelled); nothing to do.
            let _ = reply_tx.send(result);
        }
    });

    WriteHandle { tx }
}
