use criterion::{black_box, criterion_group, criterion_main, Criterion};
use url_state_params::{Config, Object, UrlStateParams, Value, ValueMap, ValueSet};

fn quiet() -> Config {
    Config::new().diagnostics(false)
}

fn user() -> Value {
    let mut address = Object::new();
    address.insert("city".to_string(), Value::from("Carrot City"));
    address.insert("street".to_string(), Value::from("Special-Street* No. 11"));
    address.insert("postcode".to_string(), Value::from("12345"));

    let mut user = Object::new();
    user.insert("id".to_string(), Value::from(42));
    user.insert("name".to_string(), Value::from("Acme"));
    user.insert("address".to_string(), Value::Object(address));
    user.insert("user_ids".to_string(), Value::from(vec![1, 2, 3, 4]));
    Value::Object(user)
}

fn mixed_map() -> ValueMap {
    let mut map = ValueMap::new();
    map.insert("name", "Jane");
    map.insert(123, 456);
    map.insert(true, false);
    map.insert("tags", ValueSet::from_iter(["a", "b", "c"]));
    map.insert(vec![1, 2], user());
    map
}

fn state() -> UrlStateParams {
    let mut state = UrlStateParams::with_config(quiet());
    state.set("text", "name");
    state.set("number", 123);
    state.set("user", user());
    state.set("set", ValueSet::from_iter(0..20));
    state.set("map", mixed_map());
    state
}

fn encode_primitive(c: &mut Criterion) {
    let encoder = quiet().encoder();
    let value = Value::from(3.14159);

    c.bench_function("encode_primitive", |b| {
        b.iter(|| encoder.safe_value(black_box(&value)))
    });
}

fn encode_object(c: &mut Criterion) {
    let encoder = quiet().encoder();
    let value = user();

    c.bench_function("encode_object", |b| {
        b.iter(|| encoder.safe_value(black_box(&value)))
    });
}

fn encode_map(c: &mut Criterion) {
    let encoder = quiet().encoder();
    let value = Value::Map(mixed_map());

    c.bench_function("encode_map", |b| {
        b.iter(|| encoder.safe_value(black_box(&value)))
    });
}

fn decode_primitive(c: &mut Criterion) {
    let decoder = quiet().decoder();

    c.bench_function("decode_primitive", |b| {
        b.iter(|| decoder.decode_str(black_box("3.14159")))
    });
}

fn decode_object(c: &mut Criterion) {
    let config = quiet();
    let encoded = config.encode(&user());

    c.bench_function("decode_object", |b| {
        b.iter(|| config.decode(black_box(&encoded)))
    });
}

fn decode_map(c: &mut Criterion) {
    let config = quiet();
    let encoded = config.encode(&Value::Map(mixed_map()));

    c.bench_function("decode_map", |b| {
        b.iter(|| config.decode(black_box(&encoded)))
    });
}

fn decode_multi_value(c: &mut Criterion) {
    let decoder = quiet().decoder();
    let raw = (0..50).map(|i| i.to_string()).collect::<Vec<_>>().join("|");

    c.bench_function("decode_multi_value", |b| {
        b.iter(|| decoder.parse(black_box(&raw)))
    });
}

fn state_to_string(c: &mut Criterion) {
    let state = state();

    c.bench_function("state_to_string", |b| {
        b.iter(|| black_box(&state).to_string())
    });
}

fn state_parse_and_get(c: &mut Criterion) {
    let query = state().to_string();

    c.bench_function("state_parse_and_get", |b| {
        b.iter(|| {
            let state = UrlStateParams::parse_with_config(black_box(&query), quiet());
            state.get("map")
        })
    });
}

fn state_append(c: &mut Criterion) {
    c.bench_function("state_append", |b| {
        b.iter(|| {
            let mut state = UrlStateParams::with_config(quiet());
            for i in 0..20 {
                state.append("ids", black_box(i));
            }
            state
        })
    });
}

criterion_group!(encode, encode_primitive, encode_object, encode_map);

criterion_group!(
    decode,
    decode_primitive,
    decode_object,
    decode_map,
    decode_multi_value
);

criterion_group!(state_ops, state_to_string, state_parse_and_get, state_append);

criterion_main!(encode, decode, state_ops);
