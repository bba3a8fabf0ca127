use once_cell::sync::Lazy;
use std::{
    collections::HashMap,
    future::Future,
    pin::Pin,
    sync::{Arc, RwLock},
};

use crate::errors::Result;
use crate::objstore::ObjectStore;

pub type BoxedObjectStoreFuture =
    Pin<Box<dyn Future<Output = Result<Box<dyn ObjectStore>>> + Send>>;
pub type ObjectStoreConstructor = Arc<dyn Fn() -> BoxedObjectStoreFuture + Send + Sync>;

static OBJECT_STORE_REGISTRY: Lazy<RwLock<HashMap<String, ObjectStoreConstructor>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

pub fn register_object_store_plugin<S: Into<String>>(name: S, constructor: ObjectStoreConstructor) {
    let name = name.into();
    let mut registry = OBJECT_STORE_REGISTRY
        .write()
        .expect("Object store registry lock poisoned");
    registry.insert(name, constructor);
}

pub fn get_object_store_plugin(name: &str) -> Option<ObjectStoreConstructor> {
    OBJECT_STORE_REGISTRY
        .read()
        .expect("Object store registry lock poisoned")
        .get(name)
        .cloned()
}
