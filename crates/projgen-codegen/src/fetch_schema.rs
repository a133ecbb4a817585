//! Fetch a GraphQL schema via introspection and convert it to SDL.

use crate::error::{CodegenError, Result};
use serde_json::Value;

const INTROSPECTION_QUERY: &str = r#"
query IntrospectionQuery {
  __schema {
    queryType { name }
    mutationType { name }
    subscriptionType { name }
    types {
      kind
      name
      description
      fields(includeDeprecated: true) {
        name
        description
        args {
          name
          description
          type { ...TypeRef }
          defaultValue
        }
        type { ...TypeRef }
        isDeprecated
        deprecationReason
      }
      inputFields {
        name
        description
        type { ...TypeRef }
        defaultValue
      }
      interfaces { ...TypeRef }
      enumValues(includeDeprecated: true) {
        name
        description
        isDeprecated
        deprecationReason
      }
      possibleTypes { ...TypeRef }
    }
  }
}

fragment TypeRef on __Type {
  kind
  name
  ofType {
    kind
    name
    ofType {
      kind
      name
      ofType {
        kind
        name
        ofType {
          kind
          name
          ofType {
            kind
            name
            ofType {
              kind
              name
            }
          }
        }
      }
    }
  }
}
"#;

/// Post the introspection query to `url` and return the schema as SDL.
///
/// `headers` are sent as-is, e.g. `("Authorization", "Bearer ...")`.
pub fn fetch_and_convert(url: &str, headers: &[(String, String)]) -> Result<String> {
    let client = reqwest::blocking::Client::new();
    let body = serde_json::json!({ "query": INTROSPECTION_QUERY });

    tracing::info!(%url, "fetching schema");
    let mut request = client.post(url).json(&body);
    for (name, value) in headers {
        request = request.header(name.as_str(), value.as_str());
    }
    let response = request.send()?;

    if !response.status().is_success() {
        return Err(CodegenError::Fetch(format!("HTTP {}", response.status())));
    }

    let json: Value = response.json()?;
    let schema = &json["data"]["__schema"];
    if schema.is_null() {
        return Err(CodegenError::Fetch("no __schema in response".into()));
    }

    Ok(introspection_to_sdl(schema))
}

/// Render an introspection `__schema` object as SDL.
///
/// Types are sorted by kind, then name, so the output is stable.
pub fn introspection_to_sdl(schema: &Value) -> String {
    let mut sdl = String::new();
    emit_schema_definition(&mut sdl, schema);

    let empty = Vec::new();
    let mut user_types: Vec<&Value> = schema["types"]
        .as_array()
        .unwrap_or(&empty)
        .iter()
        .filter(|t| !t["name"].as_str().unwrap_or("").starts_with("__"))
        .collect();
    user_types.sort_by_key(|t| {
        (
            kind_order(t["kind"].as_str().unwrap_or("")),
            t["name"].as_str().unwrap_or("").to_string(),
        )
    });

    for ty in user_types {
        let name = ty["name"].as_str().unwrap_or("");
        match ty["kind"].as_str().unwrap_or("") {
            "SCALAR" => {
                if crate::parser::BUILTIN_SCALARS.contains(&name) {
                    continue;
                }
                emit_description(&mut sdl, ty, "");
                sdl.push_str(&format!("scalar {}\n\n", name));
            }
            "ENUM" => {
                emit_description(&mut sdl, ty, "");
                sdl.push_str(&format!("enum {} {{\n", name));
                for v in ty["enumValues"].as_array().unwrap_or(&empty) {
                    emit_description(&mut sdl, v, "  ");
                    sdl.push_str(&format!("  {}", v["name"].as_str().unwrap_or("")));
                    emit_deprecated(&mut sdl, v);
                    sdl.push('\n');
                }
                sdl.push_str("}\n\n");
            }
            "INPUT_OBJECT" => {
                emit_description(&mut sdl, ty, "");
                sdl.push_str(&format!("input {} {{\n", name));
                for f in ty["inputFields"].as_array().unwrap_or(&empty) {
                    emit_description(&mut sdl, f, "  ");
                    sdl.push_str(&format!(
                        "  {}: {}",
                        f["name"].as_str().unwrap_or(""),
                        render_type_ref(&f["type"])
                    ));
                    emit_default(&mut sdl, f);
                    sdl.push('\n');
                }
                sdl.push_str("}\n\n");
            }
            kind @ ("OBJECT" | "INTERFACE") => {
                let keyword = if kind == "OBJECT" { "type" } else { "interface" };
                emit_description(&mut sdl, ty, "");
                sdl.push_str(&format!("{} {}", keyword, name));
                emit_interfaces(&mut sdl, ty);
                sdl.push_str(" {\n");
                emit_fields(&mut sdl, ty);
                sdl.push_str("}\n\n");
            }
            "UNION" => {
                emit_description(&mut sdl, ty, "");
                let members: Vec<&str> = ty["possibleTypes"]
                    .as_array()
                    .map(|arr| arr.iter().filter_map(|t| t["name"].as_str()).collect())
                    .unwrap_or_default();
                sdl.push_str(&format!("union {} = {}\n\n", name, members.join(" | ")));
            }
            _ => {}
        }
    }

    sdl
}

/// Emit `schema { ... }` only when a root uses a non-default name.
fn emit_schema_definition(sdl: &mut String, schema: &Value) {
    let roots = [
        ("query", &schema["queryType"], "Query"),
        ("mutation", &schema["mutationType"], "Mutation"),
        ("subscription", &schema["subscriptionType"], "Subscription"),
    ];
    let named: Vec<(&str, &str, &str)> = roots
        .iter()
        .filter_map(|(op, ty, default)| ty["name"].as_str().map(|name| (*op, name, *default)))
        .collect();
    if named.iter().all(|(_, name, default)| name == default) {
        return;
    }
    sdl.push_str("schema {\n");
    for (op, name, _) in named {
        sdl.push_str(&format!("  {}: {}\n", op, name));
    }
    sdl.push_str("}\n\n");
}

fn kind_order(kind: &str) -> u8 {
    match kind {
        "SCALAR" => 0,
        "ENUM" => 1,
        "INPUT_OBJECT" => 2,
        "INTERFACE" => 3,
        "OBJECT" => 4,
        "UNION" => 5,
        _ => 6,
    }
}

fn emit_description(sdl: &mut String, val: &Value, indent: &str) {
    let Some(desc) = val["description"].as_str().filter(|d| !d.is_empty()) else {
        return;
    };
    if desc.contains('\n') {
        sdl.push_str(&format!("{}\"\"\"{}\"\"\"\n", indent, desc));
    } else {
        sdl.push_str(&format!("{}\"{}\" ", indent, desc.replace('"', "\\\"")));
    }
}

fn emit_deprecated(sdl: &mut String, val: &Value) {
    if val["isDeprecated"].as_bool() != Some(true) {
        return;
    }
    match val["deprecationReason"].as_str() {
        Some(reason) => sdl.push_str(&format!(
            " @deprecated(reason: \"{}\")",
            reason.replace('"', "\\\"")
        )),
        None => sdl.push_str(" @deprecated"),
    }
}

fn emit_default(sdl: &mut String, val: &Value) {
    if let Some(dv) = val["defaultValue"].as_str().filter(|dv| !dv.is_empty()) {
        sdl.push_str(&format!(" = {}", dv));
    }
}

fn emit_interfaces(sdl: &mut String, ty: &Value) {
    let names: Vec<&str> = ty["interfaces"]
        .as_array()
        .map(|arr| arr.iter().filter_map(|i| i["name"].as_str()).collect())
        .unwrap_or_default();
    if !names.is_empty() {
        sdl.push_str(&format!(" implements {}", names.join(" & ")));
    }
}

fn emit_fields(sdl: &mut String, ty: &Value) {
    let Some(fields) = ty["fields"].as_array() else {
        return;
    };
    for f in fields {
        emit_description(sdl, f, "  ");
        let fname = f["name"].as_str().unwrap_or("");
        let ftype = render_type_ref(&f["type"]);
        match f["args"].as_array().filter(|a| !a.is_empty()) {
            Some(args) => {
                let rendered: Vec<String> = args
                    .iter()
                    .map(|arg| {
                        let mut out = format!(
                            "{}: {}",
                            arg["name"].as_str().unwrap_or(""),
                            render_type_ref(&arg["type"])
                        );
                        emit_default(&mut out, arg);
                        out
                    })
                    .collect();
                sdl.push_str(&format!("  {}({}): {}", fname, rendered.join(", "), ftype));
            }
            None => sdl.push_str(&format!("  {}: {}", fname, ftype)),
        }
        emit_deprecated(sdl, f);
        sdl.push('\n');
    }
}

fn render_type_ref(ty: &Value) -> String {
    match ty["kind"].as_str() {
        Some("NON_NULL") => format!("{}!", render_type_ref(&ty["ofType"])),
        Some("LIST") => format!("[{}]", render_type_ref(&ty["ofType"])),
        _ => ty["name"].as_str().unwrap_or("Unknown").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn named(kind: &str, name: &str) -> Value {
        json!({ "kind": kind, "name": name, "ofType": null })
    }

    fn non_null(inner: Value) -> Value {
        json!({ "kind": "NON_NULL", "name": null, "ofType": inner })
    }

    fn list(inner: Value) -> Value {
        json!({ "kind": "LIST", "name": null, "ofType": inner })
    }

    fn schema() -> Value {
        json!({
            "queryType": { "name": "Query" },
            "mutationType": null,
            "subscriptionType": null,
            "types": [
                { "kind": "OBJECT", "name": "Query", "description": null,
                  "fields": [
                      { "name": "people", "description": "All the people",
                        "args": [
                            { "name": "first", "type": named("SCALAR", "Int"), "defaultValue": "10" }
                        ],
                        "type": list(named("OBJECT", "Person")),
                        "isDeprecated": false, "deprecationReason": null }
                  ],
                  "interfaces": [] },
                { "kind": "OBJECT", "name": "Person", "description": null,
                  "fields": [
                      { "name": "id", "description": null, "args": [],
                        "type": non_null(named("SCALAR", "ID")),
                        "isDeprecated": false, "deprecationReason": null },
                      { "name": "nick", "description": null, "args": [],
                        "type": named("SCALAR", "String"),
                        "isDeprecated": true, "deprecationReason": "use name" }
                  ],
                  "interfaces": [ named("INTERFACE", "Node") ] },
                { "kind": "INTERFACE", "name": "Node", "description": null,
                  "fields": [
                      { "name": "id", "description": null, "args": [],
                        "type": non_null(named("SCALAR", "ID")),
                        "isDeprecated": false, "deprecationReason": null }
                  ],
                  "interfaces": [] },
                { "kind": "SCALAR", "name": "String", "description": null },
                { "kind": "SCALAR", "name": "DateTime", "description": "A timestamp" },
                { "kind": "ENUM", "name": "Color", "description": null,
                  "enumValues": [
                      { "name": "RED", "description": null, "isDeprecated": false, "deprecationReason": null }
                  ] },
                { "kind": "UNION", "name": "Thing", "description": null,
                  "possibleTypes": [ named("OBJECT", "Person") ] },
                { "kind": "OBJECT", "name": "__Type", "description": null, "fields": [] }
            ]
        })
    }

    #[test]
    fn renders_types_in_kind_order() {
        let sdl = introspection_to_sdl(&schema());
        let scalar = sdl.find("scalar DateTime").unwrap();
        let en = sdl.find("enum Color").unwrap();
        let iface = sdl.find("interface Node").unwrap();
        let person = sdl.find("type Person").unwrap();
        let query = sdl.find("type Query").unwrap();
        let union = sdl.find("union Thing = Person").unwrap();
        assert!(scalar < en && en < iface && iface < person && person < query && query < union);
    }

    #[test]
    fn skips_builtins_and_introspection_types() {
        let sdl = introspection_to_sdl(&schema());
        assert!(!sdl.contains("scalar String"));
        assert!(!sdl.contains("__Type"));
        assert!(!sdl.contains("schema {"));
    }

    #[test]
    fn renders_fields_arguments_and_deprecation() {
        let sdl = introspection_to_sdl(&schema());
        assert!(sdl.contains("type Person implements Node {"));
        assert!(sdl.contains("  id: ID!\n"));
        assert!(sdl.contains("  nick: String @deprecated(reason: \"use name\")\n"));
        assert!(sdl.contains("\"All the people\"   people(first: Int = 10): [Person]\n"));
        assert!(sdl.contains("\"A timestamp\" scalar DateTime"));
    }

    #[test]
    fn renames_roots_in_schema_block() {
        let mut schema = schema();
        schema["queryType"] = json!({ "name": "RootQuery" });
        let sdl = introspection_to_sdl(&schema);
        assert!(sdl.starts_with("schema {\n  query: RootQuery\n}\n\n"));
    }

    #[test]
    fn sdl_round_trips_through_the_parser() {
        let sdl = introspection_to_sdl(&schema());
        let doc = crate::parser::parse(&sdl);
        let query = doc.query_root().unwrap();
        assert_eq!(query.fields[0].name, "people");
        assert_eq!(query.fields[0].ty.base_name(), "Person");
        assert!(doc.definition("Person").unwrap().is_composite());
    }
}
