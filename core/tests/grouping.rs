use grouper_core::oas::validation::find_duplicates_in_groups;
use grouper_core::{
    find_duplicates_in_json, group_documents, ApiDocument, DocumentFormat, FieldType,
    GrouperConfig, SchemaType,
};
use pretty_assertions::assert_eq;
use serde_json::json;

const STORE: &str = r#"
openapi: 3.0.3
info: {title: Store, version: 1.0.0}
paths:
  /pets:
    get:
      operationId: listPets
      tags: [pets]
      responses:
        '200':
          description: OK
          content:
            application/json:
              schema:
                type: array
                items: {$ref: '#/components/schemas/Pet'}
    post:
      tags: [pets, admin]
      responses: { '201': {description: Created} }
  /pets/{petId}:
    get:
      operationId: showPetById
      tags: [pets]
      responses:
        '200':
          description: OK
          content:
            application/json:
              schema: {$ref: '#/components/schemas/Pet'}
  /subscriptions:
    post:
      tags: [Notification Listener]
      responses: { '204': {description: OK} }
components:
  schemas:
    Named:
      type: object
      required: [name]
      properties:
        name: {type: string, description: Display name}
    Pet:
      description: A pet in the store
      allOf:
        - $ref: '#/components/schemas/Named'
        - type: object
          required: [id]
          properties:
            id: {type: integer, format: int64}
            parent: {$ref: '#/components/schemas/Pet'}
            kind:
              oneOf:
                - $ref: '#/components/schemas/Cat'
                - {type: string}
    Cat:
      type: object
      properties:
        lives: {type: integer}
"#;

fn store() -> ApiDocument {
    ApiDocument::parse("store.yaml", STORE, DocumentFormat::Yaml).unwrap()
}

#[test]
fn test_store_grouping_end_to_end() {
    let doc = store();
    let grouped = group_documents([&doc], GrouperConfig::default());

    let tags: Vec<_> = grouped.iter().map(|(tag, _)| tag.as_str()).collect();
    assert_eq!(tags, vec!["pets", "admin"]);

    let pets = grouped.get("pets").unwrap();
    let ids: Vec<_> = pets
        .endpoints
        .iter()
        .map(|e| e.operation_id.as_str())
        .collect();
    assert_eq!(ids, vec!["listPets", "postpets", "showPetById"]);

    // The list endpoint comes first and resolves, so the array wrapper wins.
    assert_eq!(pets.underlying_type.as_deref(), Some("Array<Pet>"));
    let wrapper = pets.schema.as_ref().unwrap();
    let element = wrapper.fields["items"].items.as_ref().unwrap();
    assert_eq!(element.name, "Pet");

    let admin = grouped.get("admin").unwrap();
    assert_eq!(admin.table_name, "Admin");
    assert!(admin.underlying_type.is_none());
}

#[test]
fn test_composed_self_referencing_type() {
    let doc = store();
    let node = json!({"$ref": "#/components/schemas/Pet"});
    let (name, pet) =
        grouper_core::normalize_schema(&node, &doc.root, &mut Default::default()).unwrap();

    assert_eq!(name.as_deref(), Some("Pet"));
    assert_eq!(pet.description.as_deref(), Some("A pet in the store"));
    assert_eq!(
        pet.fields.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["name", "id", "parent", "kind"]
    );
    assert_eq!(
        pet.required.iter().map(String::as_str).collect::<Vec<_>>(),
        vec!["name", "id"]
    );

    let parent = &pet.fields["parent"];
    assert_eq!(parent.description.as_deref(), Some("Reference to Pet"));

    let kind = &pet.fields["kind"];
    assert_eq!(kind.ty, FieldType::Union);
    let variants = kind.one_of.as_ref().unwrap();
    assert_eq!(variants[0].name, "kind_variant_0");
    assert_eq!(variants[0].ty, FieldType::Object);
    assert_eq!(variants[1].ty, FieldType::String);
}

#[test]
fn test_required_is_subset_of_fields() {
    let doc = store();
    let grouped = group_documents([&doc], GrouperConfig::default());

    fn check(ty: &SchemaType) {
        if ty.one_of.is_none() {
            for name in &ty.required {
                assert!(ty.fields.contains_key(name), "{} missing from {}", name, ty.name);
            }
        }
    }
    for (_, group) in grouped.iter() {
        if let Some(schema) = &group.schema {
            check(schema);
        }
    }
}

#[test]
fn test_serialized_output_round_trips_through_validator() {
    let doc = store();
    let grouped = group_documents([&doc], GrouperConfig::default());
    let artifact = serde_json::to_string_pretty(&grouped).unwrap();

    let duplicates = find_duplicates_in_json(&artifact).unwrap();
    assert_eq!(duplicates.len(), 1);
    assert_eq!(duplicates[0].route_key, "/pets:post");
    let tags: Vec<_> = duplicates[0]
        .occurrences
        .iter()
        .map(|o| o.tag.as_str())
        .collect();
    assert_eq!(tags, vec!["pets", "admin"]);

    assert_eq!(find_duplicates_in_groups(&grouped), duplicates);
}

#[test]
fn test_output_shape() {
    let doc = ApiDocument::parse(
        "mini.json",
        r#"{
  "openapi": "3.0.0",
  "paths": {
    "/x/{id}": {
      "get": {
        "tags": ["things"],
        "responses": {"200": {"description": "OK", "content": {"application/json": {
          "schema": {"title": "Thing", "type": "object", "required": ["id"],
                     "properties": {"id": {"type": "string"}}}
        }}}}
      }
    }
  }
}"#,
        DocumentFormat::Json,
    )
    .unwrap();
    let grouped = group_documents([&doc], GrouperConfig::default());

    assert_eq!(
        serde_json::to_value(&grouped).unwrap(),
        json!({
            "things": {
                "tableName": "Things",
                "endpoints": [{"operationId": "getxId", "path": "/x/{id}", "method": "get"}],
                "underlyingType": "Thing",
                "schema": {
                    "name": "Thing",
                    "fields": {"id": {"name": "id", "type": "string", "required": true}},
                    "required": ["id"]
                }
            }
        })
    );
}
