/// Keyed registration and resolution

use servfor_di::{DiError, Lifetime, Resolver, ServiceCollection, ServiceKey};
use std::sync::Arc;

trait Repo: Send + Sync {
    fn schema(&self) -> &str;
}

struct SchemaRepo(String);

impl Repo for SchemaRepo {
    fn schema(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Region {
    Emea,
    Apac,
}

fn repo(schema: &str) -> Arc<dyn Repo> {
    Arc::new(SchemaRepo(schema.to_string()))
}

#[test]
fn test_string_keys_select_bindings() {
    let mut sc = ServiceCollection::new();
    sc.add_keyed_trait_factory::<dyn Repo, _>("hr", Lifetime::Transient, |_| Ok(repo("HR")));
    sc.add_keyed_trait_factory::<dyn Repo, _>("sales", Lifetime::Transient, |_| Ok(repo("SALES")));

    let sp = sc.build();
    assert_eq!(sp.get_keyed_trait::<dyn Repo, _>("hr").unwrap().schema(), "HR");
    assert_eq!(sp.get_keyed_trait::<dyn Repo, _>("sales".to_string()).unwrap().schema(), "SALES");
}

#[test]
fn test_enum_keys_select_bindings() {
    let mut sc = ServiceCollection::new();
    sc.add_keyed_trait_factory::<dyn Repo, _>(ServiceKey::new(Region::Emea), Lifetime::Singleton, |_| Ok(repo("EU")));
    sc.add_keyed_trait_factory::<dyn Repo, _>(ServiceKey::new(Region::Apac), Lifetime::Singleton, |_| Ok(repo("AP")));

    let sp = sc.build();
    let emea = sp.get_keyed_trait::<dyn Repo, _>(Region::Emea).unwrap();
    assert_eq!(emea.schema(), "EU");
    assert!(Arc::ptr_eq(&emea, &sp.get_keyed_trait_required::<dyn Repo, _>(Region::Emea)));
    assert_eq!(sp.get_keyed_trait::<dyn Repo, _>(Region::Apac).unwrap().schema(), "AP");
}

#[test]
fn test_keyed_binding_is_not_resolvable_unkeyed() {
    let mut sc = ServiceCollection::new();
    sc.add_keyed_trait_factory::<dyn Repo, _>("hr", Lifetime::Transient, |_| Ok(repo("HR")));

    let sp = sc.build();
    assert!(matches!(sp.get_trait::<dyn Repo>(), Err(DiError::NotFound(_))));
    assert!(!sp.is_trait_registered::<dyn Repo>());
    assert!(sp.is_trait_registered_with_key::<dyn Repo, _>("hr"));
}

#[test]
fn test_unknown_key_is_not_found() {
    let mut sc = ServiceCollection::new();
    sc.add_keyed_trait_factory::<dyn Repo, _>("hr", Lifetime::Transient, |_| Ok(repo("HR")));

    let sp = sc.build();
    assert!(matches!(sp.get_keyed_trait::<dyn Repo, _>("finance"), Err(DiError::NotFound(_))));
    assert!(matches!(sp.get_keyed_trait::<dyn Repo, _>(Region::Emea), Err(DiError::NotFound(_))));
}

#[test]
fn test_keys_of_different_types_do_not_collide() {
    let mut sc = ServiceCollection::new();
    sc.add_keyed_factory::<u32, _>(1u8, Lifetime::Transient, |_| Ok(8));
    sc.add_keyed_factory::<u32, _>(1u16, Lifetime::Transient, |_| Ok(16));

    let sp = sc.build();
    assert_eq!(*sp.get_keyed::<u32, _>(1u8).unwrap(), 8);
    assert_eq!(*sp.get_keyed::<u32, _>(1u16).unwrap(), 16);
    assert!(sp.get_keyed::<u32, _>(1u32).is_err());
}

#[test]
fn test_keyed_factory_resolves_other_keys_of_same_trait() {
    let mut sc = ServiceCollection::new();
    sc.add_keyed_trait_factory::<dyn Repo, _>("base", Lifetime::Singleton, |_| Ok(repo("BASE")));
    sc.add_keyed_trait_factory::<dyn Repo, _>("derived", Lifetime::Transient, |r| {
        let base = r.get_keyed_trait::<dyn Repo, _>("base")?;
        Ok(repo(&format!("{}_EXT", base.schema())))
    });

    let sp = sc.build();
    assert_eq!(sp.get_keyed_trait::<dyn Repo, _>("derived").unwrap().schema(), "BASE_EXT");
}

#[test]
fn test_keyed_factory_errors_propagate() {
    let mut sc = ServiceCollection::new();
    sc.add_keyed_trait_factory::<dyn Repo, _>("broken", Lifetime::Transient, |_| {
        Err(DiError::InvalidConnectionString("missing Data Source".to_string()))
    });

    let sp = sc.build();
    assert_eq!(
        sp.get_keyed_trait::<dyn Repo, _>("broken").err(),
        Some(DiError::InvalidConnectionString("missing Data Source".to_string()))
    );
}

#[test]
fn test_enum_keys_register_without_wrapping() {
    let mut sc = ServiceCollection::new();
    sc.add_keyed_trait_factory::<dyn Repo, _>(Region::Emea, Lifetime::Transient, |_| Ok(repo("EU")));
    sc.add_keyed_factory::<String, _>(7u64, Lifetime::Singleton, |_| Ok("seven".to_string()));

    assert!(sc.is_trait_registered_with_key::<dyn Repo>(Region::Emea));
    assert!(!sc.is_trait_registered_with_key::<dyn Repo>(Region::Apac));
    assert!(sc.is_registered_with_key::<String>(7u64));
    assert!(sc.is_registered_with_key::<String>(ServiceKey::new(7u64)));
    assert!(!sc.is_registered_with_key::<String>(7u32));

    let sp = sc.build();
    assert_eq!(sp.get_keyed_trait::<dyn Repo, _>(Region::Emea).unwrap().schema(), "EU");
    assert_eq!(*sp.get_keyed::<String, _>(7u64).unwrap(), "seven");
}
