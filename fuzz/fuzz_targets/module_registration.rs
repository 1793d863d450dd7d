#![no_main]

use libfuzzer_sys::fuzz_target;
use servfor_di::{Resolver, ServForOracleModule, ServiceCollection, ServiceForOracle};
use std::collections::HashMap;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Lines are `key=connection string`; a line without '=' is an unkeyed string.
    let mut pairs = HashMap::new();
    let mut single = None;
    for line in text.lines() {
        match line.split_once('=') {
            Some((key, value)) => {
                pairs.insert(key.to_string(), value.to_string());
            }
            None => single = Some(line.to_string()),
        }
    }

    if let Some(single) = single {
        if let Ok(module) = ServForOracleModule::from_connection_string(single) {
            let mut services = ServiceCollection::new();
            module.load(&mut services);
            let provider = services.build();
            let service = provider.get_trait::<dyn ServiceForOracle>().unwrap();
            let _ = service.describe_connection();
        }
    }

    let Ok(module) = ServForOracleModule::from_named(pairs.clone()) else {
        assert!(pairs.is_empty() || pairs.values().any(|v| v.trim().is_empty()));
        return;
    };

    let mut services = ServiceCollection::new();
    module.load(&mut services);
    assert_eq!(services.len(), 2 + 2 * pairs.len());

    let provider = services.build();
    for (key, value) in &pairs {
        let service = provider.get_keyed_trait::<dyn ServiceForOracle, _>(key.clone()).unwrap();
        assert_eq!(service.connection_factory().connection_string(), value);
    }
});
