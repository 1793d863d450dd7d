/// Error values produced by module construction, parsing and resolution

use servfor_di::{
    ConnectionEnum, ConnectionInfo, DiError, DiResult, Lifetime, Resolver, ServForOracleModule, ServiceCollection,
    ServiceCollectionExt, ServiceForOracle,
};
use std::collections::HashMap;
use std::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Shard {
    North,
}

impl ConnectionEnum for Shard {
    fn variants() -> &'static [Self] {
        &[Shard::North]
    }
}

#[test]
fn test_invalid_argument_names_each_constructor_parameter() {
    let cases: Vec<(DiResult<ServForOracleModule>, &str)> = vec![
        (ServForOracleModule::from_connection_string("  "), "connection_string"),
        (ServForOracleModule::from_named(HashMap::new()), "key_name_connection_strings_pairs"),
        (
            ServForOracleModule::from_enum_map(HashMap::from([(Shard::North, String::new())])),
            "key_name_connection_strings_pairs",
        ),
        (
            ServForOracleModule::from_enum_sequence::<Shard, _, _>(["Data Source=n", ""]),
            "connection_strings",
        ),
    ];

    for (result, parameter) in cases {
        let error = result.unwrap_err();
        assert_eq!(error, DiError::InvalidArgument(parameter));
        assert_eq!(error.to_string(), format!("Invalid argument: {parameter}"));
    }
}

#[test]
fn test_invalid_connection_string_messages() {
    let cases = [
        ("User Id=scott", "Invalid connection string: missing Data Source"),
        ("Data Source=db;garbage", "Invalid connection string: segment 1 is not a key=value pair"),
        ("=db", "Invalid connection string: segment 0 has an empty key"),
    ];

    for (input, expected) in cases {
        let error = ConnectionInfo::parse(input).unwrap_err();
        assert!(matches!(error, DiError::InvalidConnectionString(_)));
        assert_eq!(error.to_string(), expected);
    }
}

#[test]
fn test_invalid_connection_string_surfaces_through_service() {
    let provider = ServiceCollection::new()
        .add_module(ServForOracleModule::from_connection_string("Password=tiger").unwrap())
        .unwrap()
        .build();

    let error = provider
        .get_trait::<dyn ServiceForOracle>()
        .unwrap()
        .describe_connection()
        .unwrap_err();
    assert_eq!(error, DiError::InvalidConnectionString("missing Data Source".to_string()));
    assert!(!error.to_string().contains("tiger"));
}

#[test]
fn test_not_found_names_the_missing_binding() {
    let provider = ServiceCollection::new().build();
    let error = provider.get_keyed_trait::<dyn ServiceForOracle, _>("hr").err().unwrap();

    match &error {
        DiError::NotFound(name) => assert!(name.contains("ServiceForOracle")),
        other => panic!("Expected NotFound, got {other:?}"),
    }
    assert!(error.to_string().starts_with("Service not found: "));
}

#[test]
fn test_scoped_service_from_root_is_lifetime_error() {
    let module = ServForOracleModule::from_connection_string("Data Source=db")
        .unwrap()
        .with_service_lifetime(Lifetime::Scoped);
    let provider = ServiceCollection::new().add_module(module).unwrap().build();

    let error = provider.get_trait::<dyn ServiceForOracle>().err().unwrap();
    assert!(matches!(error, DiError::WrongLifetime(_)));
    assert!(error.to_string().starts_with("Lifetime error: "));
}

#[cfg(feature = "config")]
#[test]
fn test_config_errors_carry_the_cause() {
    use servfor_di::ConnectionConfig;

    let error = ConnectionConfig::from_json_str(r#"{ "connection_string": 5 }"#).unwrap_err();
    match &error {
        DiError::Config(message) => assert!(message.contains("line 1")),
        other => panic!("Expected Config, got {other:?}"),
    }
    assert!(error.to_string().starts_with("Configuration error: "));

    let error = ConnectionConfig::from_json_str(r#"{ "connection_string": "Data Source=x", "pool": 4 }"#).unwrap_err();
    assert!(matches!(error, DiError::Config(message) if message.contains("pool")));
}

#[test]
fn test_circular_path_display() {
    let error = DiError::Circular(vec!["dyn ServiceForOracle", "dyn DbConnectionFactory", "dyn ServiceForOracle"]);
    assert_eq!(
        error.to_string(),
        "Circular dependency: dyn ServiceForOracle -> dyn DbConnectionFactory -> dyn ServiceForOracle"
    );
    assert_eq!(DiError::DepthExceeded(1024).to_string(), "Max depth 1024 exceeded");
}

#[test]
fn test_errors_are_std_errors_without_source() {
    let errors = [
        DiError::InvalidArgument("connection_string"),
        DiError::InvalidConnectionString("missing Data Source".to_string()),
        DiError::Config("bad".to_string()),
    ];
    for error in &errors {
        let as_std: &dyn Error = error;
        assert!(as_std.source().is_none());
        assert_eq!(error.clone(), *error);
    }
}
