use crate::resources::{
    Bike, BikeHandler, Book, BookHandler, Car, CarHandler, Movie, MovieHandler, Restaurant,
    RestaurantHandler,
};
use resource_framework::{AccessPolicy, Resource, ResourceHandler, StoreActor};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    #[error("Store task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}

/// The runtime orchestrator: one running store per resource kind.
///
/// # Example
///
/// ```ignore
/// let system = ResourceSystem::new(32);
/// let bike = system.bikes.create(&admin, bike_fields).await?;
///
/// system.shutdown().await?;
/// ```
pub struct ResourceSystem {
    pub bikes: BikeHandler,
    pub cars: CarHandler,
    pub movies: MovieHandler,
    pub books: BookHandler,
    pub restaurants: RestaurantHandler,

    /// Task handles for all running stores (used for graceful shutdown)
    handles: Vec<JoinHandle<()>>,
}

impl ResourceSystem {
    /// Spawns every store with the standard access policy.
    ///
    /// `buffer_size` is the request channel capacity of each store.
    pub fn new(buffer_size: usize) -> Self {
        Self::with_policy(buffer_size, Arc::new(AccessPolicy::standard()))
    }

    /// Spawns every store; all handlers share `policy`.
    pub fn with_policy(buffer_size: usize, policy: Arc<AccessPolicy>) -> Self {
        let mut handles = Vec::with_capacity(5);

        let bikes = spawn_store::<Bike>(buffer_size, &policy, &mut handles);
        let cars = spawn_store::<Car>(buffer_size, &policy, &mut handles);
        let movies = spawn_store::<Movie>(buffer_size, &policy, &mut handles);
        let books = spawn_store::<Book>(buffer_size, &policy, &mut handles);
        let restaurants = spawn_store::<Restaurant>(buffer_size, &policy, &mut handles);

        info!(stores = handles.len(), buffer_size, "Resource system started");

        Self {
            bikes,
            cars,
            movies,
            books,
            restaurants,
            handles,
        }
    }

    /// Drops every handler and waits for the stores to exit.
    ///
    /// Returns an error if any store task panicked.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down system...");

        let Self {
            bikes,
            cars,
            movies,
            books,
            restaurants,
            handles,
        } = self;
        drop((bikes, cars, movies, books, restaurants));

        for handle in handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Store task failed");
                return Err(e.into());
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}

fn spawn_store<R: Resource>(
    buffer_size: usize,
    policy: &Arc<AccessPolicy>,
    handles: &mut Vec<JoinHandle<()>>,
) -> ResourceHandler<R> {
    let (actor, client) = StoreActor::<R>::new(buffer_size);
    handles.push(tokio::spawn(actor.run()));
    ResourceHandler::with_policy(client, policy.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use resource_framework::{Role, Roles};

    #[tokio::test]
    async fn stores_are_independent() {
        let system = ResourceSystem::new(8);
        let admin = Roles::from_iter([Role::Admin]);

        let bike = system
            .bikes
            .create(
                &admin,
                Bike {
                    manufacturer: "Trek".into(),
                    model: "Domane".into(),
                    num_gears: 22,
                },
            )
            .await
            .unwrap();
        let book = system
            .books
            .create(
                &admin,
                Book {
                    name: "Dune".into(),
                    genre: "SF".into(),
                    author: "Herbert".into(),
                },
            )
            .await
            .unwrap();

        // each kind numbers its own records
        assert_eq!(bike.id, 0);
        assert_eq!(book.id, 0);
        assert!(system.cars.list(&admin).await.unwrap().is_empty());

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn shutdown_completes_with_no_traffic() {
        let system = ResourceSystem::new(1);
        system.shutdown().await.unwrap();
    }
}
