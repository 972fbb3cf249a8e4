use serde_json::{json, Value};
use std::collections::HashSet;
use std::rc::Rc;
use swagger_form::domain::definition::ParameterDefinition;
use swagger_form::domain::document::SwaggerDocument;
use swagger_form::form::{
    render_outline, synthesize_document, ControlKind, EnumWidget, FieldNode, FormError, FormOptions,
    OperationForm, ScalarInput,
};

fn form_of(params: Value) -> OperationForm {
    form_with(params, FormOptions::default())
}

fn form_with(params: Value, options: FormOptions) -> OperationForm {
    let params: Vec<ParameterDefinition> = serde_json::from_value(params).unwrap();
    OperationForm::from_parameters("op", &params, Rc::new(options)).unwrap()
}

fn petstore() -> SwaggerDocument {
    SwaggerDocument::from_value(json!({
        "swagger": "2.0",
        "info": { "title": "Petstore", "version": "1.0.0" },
        "paths": {
            "/pet": {
                "post": {
                    "tags": ["pet"],
                    "summary": "Add a new pet to the store",
                    "operationId": "addPet",
                    "parameters": [
                        { "name": "body", "in": "body", "required": true,
                          "schema": { "$ref": "#/definitions/Pet" } }
                    ]
                }
            },
            "/pet/{petId}/uploadImage": {
                "post": {
                    "tags": ["pet"],
                    "operationId": "uploadFile",
                    "parameters": [
                        { "name": "petId", "in": "path", "required": true, "type": "integer", "format": "int64" },
                        { "name": "additionalMetadata", "in": "formData", "type": "string" },
                        { "name": "file", "in": "formData", "type": "file" }
                    ]
                }
            }
        },
        "definitions": {
            "Category": {
                "type": "object",
                "properties": { "id": { "type": "integer" }, "name": { "type": "string" } }
            },
            "Tag": {
                "type": "object",
                "properties": { "id": { "type": "integer" }, "name": { "type": "string" } }
            },
            "Pet": {
                "type": "object",
                "required": ["name", "photoUrls"],
                "properties": {
                    "id": { "type": "integer", "format": "int64" },
                    "category": { "$ref": "#/definitions/Category" },
                    "name": { "type": "string", "example": "doggie" },
                    "photoUrls": { "type": "array", "items": { "type": "string" } },
                    "tags": { "type": "array", "items": { "$ref": "#/definitions/Tag" } },
                    "status": { "type": "string", "enum": ["available", "pending", "sold"] }
                }
            }
        }
    }))
    .unwrap()
}

// ============================================================================
// Getter shape
// ============================================================================

#[test]
fn test_one_entry_and_one_field_per_declared_name() {
    let form = form_of(json!([
        { "name": "a", "type": "string" },
        { "name": "b", "type": "integer" },
        { "name": "c", "type": "boolean" },
        { "name": "d", "type": "date" },
        { "name": "e", "type": "password" }
    ]));

    assert_eq!(form.fields.len(), 5);
    assert_eq!(form.getter().names(), vec!["a", "b", "c", "d", "e"]);
    assert_eq!(
        form.values(),
        json!({ "a": "", "b": 0, "c": false, "d": "", "e": "" })
    );
}

#[test]
fn test_nested_shape_mirrors_schema() {
    let forms = synthesize_document(&petstore(), FormOptions::default()).unwrap();
    let form = &forms[0];

    form.field("body.name").unwrap().set_value("doggie");
    form.field("body.category.name").unwrap().set_value("dogs");
    form.field("body.photoUrls[0]").unwrap().set_value("http://x/1.png");
    form.field("body.tags[0].name").unwrap().set_value("good");

    assert_eq!(
        form.values(),
        json!({
            "body": {
                "id": 0,
                "category": { "id": 0, "name": "dogs" },
                "name": "doggie",
                "photoUrls": ["http://x/1.png"],
                "tags": [{ "id": 0, "name": "good" }],
                "status": "available"
            }
        })
    );
}

#[test]
fn test_identifiers_unique_across_nesting() {
    let forms = synthesize_document(&petstore(), FormOptions::default()).unwrap();
    let form = &forms[0];
    form.array("body.tags").unwrap().append().unwrap();
    form.array("body.tags").unwrap().append().unwrap();

    let ids = form.identifiers();
    let unique: HashSet<&String> = ids.iter().collect();
    assert_eq!(ids.len(), unique.len());
    assert!(ids.contains(&"POST /pet-body.tags[2].name".to_string()));
    assert!(ids.contains(&"POST /pet-body.category.id".to_string()));
}

// ============================================================================
// Enablement
// ============================================================================

#[test]
fn test_disable_then_reenable_keeps_state() {
    let form = form_of(json!([{ "name": "q", "type": "string" }]));
    let field = form.field("q").unwrap();
    field.set_value("cats");

    field.set_enabled(false);
    assert_eq!(form.values(), json!({}));
    assert_eq!(form.getter().read("q"), None);

    field.set_enabled(true);
    assert_eq!(form.values(), json!({ "q": "cats" }));
}

#[test]
fn test_disabling_a_toggle_group_disables_every_toggle() {
    let form = form_of(json!([{ "name": "mode", "type": "string", "enum": ["a", "b", "c"] }]));
    let field = form.field("mode").unwrap();
    field.set_enabled(false);

    assert_eq!(field.controls().len(), 3);
    assert!(field.controls().iter().all(|c| c.is_disabled()));
    assert_eq!(form.getter().read("mode"), None);
}

#[test]
fn test_required_fields_always_report() {
    let forms = synthesize_document(&petstore(), FormOptions::default()).unwrap();
    let upload = &forms[1];
    let pet_id = upload.field("petId").unwrap();

    assert!(pet_id.is_required());
    assert!(pet_id.toggle.control().is_disabled());
    assert_eq!(pet_id.toggle.title(), "This parameter is Required");

    pet_id.set_enabled(false);
    assert_eq!(upload.getter().read("petId"), Some(json!(0)));

    let metadata = upload.field("additionalMetadata").unwrap();
    assert_eq!(metadata.toggle.title(), "Uncheck to not send the parameter");
}

#[test]
fn test_containers_have_no_toggle_but_children_do() {
    let forms = synthesize_document(&petstore(), FormOptions::default()).unwrap();
    let form = &forms[0];
    let FieldNode::Object(body) = &form.fields[0] else {
        panic!("expected object body");
    };
    assert_eq!(body.definition_name.as_deref(), Some("Pet"));

    let id = form.field("body.id").unwrap();
    id.set_enabled(false);
    assert!(form.values()["body"].get("id").is_none());
}

// ============================================================================
// Enums
// ============================================================================

#[test]
fn test_enum_representation_switches_on_max_radio() {
    let short: Vec<String> = (0..3).map(|i| format!("v{}", i)).collect();
    let long: Vec<String> = (0..8).map(|i| format!("v{}", i)).collect();
    let form = form_of(json!([
        { "name": "short", "type": "string", "enum": short },
        { "name": "long", "type": "string", "enum": long }
    ]));

    let short = form.field("short").unwrap();
    assert_eq!(short.kind(), ControlKind::Radio);
    let ScalarInput::Enum(EnumWidget::Toggles(group)) = &short.input else {
        panic!("expected toggles");
    };
    assert_eq!(group.group(), "op-short");
    assert_eq!(group.toggles()[2].id(), "op-short:v2");

    let long = form.field("long").unwrap();
    assert_eq!(long.kind(), ControlKind::Select);
    assert_eq!(long.controls().len(), 1);

    assert_eq!(form.values(), json!({ "short": "v0", "long": "v0" }));
}

#[test]
fn test_max_radio_option_is_honoured() {
    let form = form_with(
        json!([{ "name": "s", "type": "string", "enum": ["a", "b", "c"] }]),
        FormOptions::default().with_max_radio(2),
    );
    assert_eq!(form.field("s").unwrap().kind(), ControlKind::Select);
}

// ============================================================================
// Numbers
// ============================================================================

#[test]
fn test_exclusive_bounds() {
    let form = form_of(json!([
        { "name": "max", "type": "integer", "maximum": 10, "exclusiveMaximum": true },
        { "name": "min", "type": "integer", "minimum": 0, "exclusiveMinimum": true },
        { "name": "plain", "type": "number", "minimum": 2, "maximum": 4 }
    ]));

    let hints = form.field("max").unwrap().controls()[0].hints();
    assert_eq!(hints.max, Some(9.0));
    let hints = form.field("min").unwrap().controls()[0].hints();
    assert_eq!(hints.min, Some(1.0));
    let hints = form.field("plain").unwrap().controls()[0].hints();
    assert_eq!((hints.min, hints.max), (Some(2.0), Some(4.0)));
}

// ============================================================================
// Arrays
// ============================================================================

#[test]
fn test_min_items_append_and_csv() {
    let form = form_of(json!([{
        "name": "tags",
        "type": "array",
        "minItems": 2,
        "collectionFormat": "csv",
        "items": { "type": "string" }
    }]));
    let FieldNode::Array(tags) = &form.fields[0] else {
        panic!("expected array");
    };
    assert_eq!(tags.len(), 2);

    form.array("tags").unwrap().append().unwrap();
    assert_eq!(tags.len(), 3);

    form.field("tags[0]").unwrap().set_value("a");
    form.field("tags[1]").unwrap().set_value("b");
    form.field("tags[2]").unwrap().set_value("c");
    assert_eq!(form.values(), json!({ "tags": "a,b,c" }));

    form.field("tags[1]").unwrap().set_enabled(false);
    assert_eq!(form.values(), json!({ "tags": "a,,c" }));
}

#[test]
fn test_appends_are_independently_addressable() {
    let form = form_of(json!([{ "name": "ids", "type": "array", "items": { "type": "integer" } }]));
    let appender = form.array("ids").unwrap();
    for _ in 0..4 {
        appender.append().unwrap();
    }
    assert_eq!(appender.len(), 5);
    for i in 0..5 {
        form.field(&format!("ids[{}]", i)).unwrap().set_value(&i.to_string());
    }
    assert_eq!(form.values(), json!({ "ids": [0, 1, 2, 3, 4] }));
}

#[test]
fn test_array_in_object_in_array() {
    let form = form_of(json!([{
        "name": "orders",
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "lines": { "type": "array", "collectionFormat": "pipes", "items": { "type": "string" } }
            }
        }
    }]));

    form.array("orders").unwrap().append().unwrap();
    form.array("orders[1].lines").unwrap().append().unwrap();
    form.field("orders[1].lines[0]").unwrap().set_value("x");
    form.field("orders[1].lines[1]").unwrap().set_value("y");

    assert_eq!(
        form.values(),
        json!({ "orders": [{ "lines": "" }, { "lines": "x|y" }] })
    );
    assert!(form
        .identifiers()
        .contains(&"op-orders[1].lines[1]".to_string()));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_missing_reference_marks_one_field() {
    let options = FormOptions::default().with_definitions(json!({ "definitions": {} }));
    let form = form_with(
        json!([
            { "name": "before", "type": "string" },
            { "name": "body", "in": "body", "schema": { "$ref": "#/definitions/Missing" } },
            { "name": "after", "type": "integer" }
        ]),
        options,
    );

    let errors = form.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].id, "op-body");
    assert!(matches!(errors[0].error, FormError::MissingDefinition { .. }));
    assert_eq!(form.values(), json!({ "before": "", "after": 0 }));
}

#[test]
fn test_outline_of_document() {
    let forms = synthesize_document(&petstore(), FormOptions::default()).unwrap();
    let outline = render_outline(&forms[1]);
    let lines: Vec<&str> = outline.lines().collect();
    assert_eq!(lines[0], "POST /pet/{petId}/uploadImage");
    assert_eq!(lines[1], "  [*] POST /pet/{petId}/uploadImage-petId <number> = \"\"");
    assert_eq!(lines[3], "  [x] POST /pet/{petId}/uploadImage-file <file> = \"\"");
}

#[test]
fn test_recursive_definition_is_cut_at_the_repeat() {
    let document = SwaggerDocument::from_value(json!({
        "info": { "title": "Tree", "version": "1" },
        "paths": {
            "/tree": {
                "post": {
                    "parameters": [
                        { "name": "body", "in": "body", "schema": { "$ref": "#/definitions/Node" } }
                    ]
                }
            }
        },
        "definitions": {
            "Node": {
                "type": "object",
                "properties": {
                    "label": { "type": "string" },
                    "children": { "type": "array", "items": { "$ref": "#/definitions/Node" } },
                    "parent": { "$ref": "#/definitions/Node" }
                }
            }
        }
    }))
    .unwrap();

    let forms = synthesize_document(&document, FormOptions::default()).unwrap();
    let form = &forms[0];

    let errors = form.errors();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].id, "POST /tree-body.children[0]");
    assert_eq!(errors[1].id, "POST /tree-body.parent");
    assert!(errors
        .iter()
        .all(|e| matches!(&e.error, FormError::CircularReference { reference, .. }
            if reference == "#/definitions/Node")));

    form.field("body.label").unwrap().set_value("root");
    assert_eq!(form.values(), json!({ "body": { "label": "root", "children": [] } }));

    form.array("body.children").unwrap().append().unwrap();
    assert_eq!(form.errors().len(), 3);
}

#[test]
fn test_repeated_reference_in_siblings_is_not_circular() {
    let options = FormOptions::default().with_definitions(json!({
        "definitions": {
            "Point": {
                "type": "object",
                "properties": { "x": { "type": "integer" }, "y": { "type": "integer" } }
            },
            "Edge": {
                "type": "object",
                "properties": {
                    "from": { "$ref": "#/definitions/Point" },
                    "to": { "$ref": "#/definitions/Point" }
                }
            }
        }
    }));
    let form = form_with(
        json!([{ "name": "edges", "in": "body",
                 "schema": { "type": "array", "items": { "$ref": "#/definitions/Edge" } } }]),
        options,
    );

    assert!(form.errors().is_empty());
    form.array("edges").unwrap().append().unwrap();
    form.field("edges[1].to.y").unwrap().set_value("4");
    assert_eq!(
        form.values(),
        json!({ "edges": [
            { "from": { "x": 0, "y": 0 }, "to": { "x": 0, "y": 0 } },
            { "from": { "x": 0, "y": 0 }, "to": { "x": 0, "y": 4 } }
        ] })
    );
}

#[test]
fn test_malformed_parameter_marks_only_itself() {
    let document = SwaggerDocument::from_value(json!({
        "info": { "title": "Items", "version": "1" },
        "paths": {
            "/items": {
                "get": {
                    "parameters": [
                        { "name": "good", "in": "query", "type": "string" },
                        { "name": "bad", "in": "query", "type": "integer",
                          "maximum": 10, "exclusiveMaximum": 9 },
                        { "name": "list", "in": "body", "schema": { "$ref": "#/definitions/Broken" } }
                    ]
                }
            },
            "/health": { "get": {} }
        },
        "definitions": {
            "Broken": { "type": "array", "minItems": -1, "items": { "type": "string" } }
        }
    }))
    .unwrap();

    let forms = synthesize_document(&document, FormOptions::default()).unwrap();
    assert_eq!(forms.len(), 2);
    let form = &forms[0];

    let errors = form.errors();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].id, "GET /items-bad");
    assert!(matches!(&errors[0].error, FormError::MalformedParameter { field, reason }
        if field == "bad" && reason.contains("expected a boolean")));
    assert_eq!(errors[1].id, "GET /items-list");
    assert!(matches!(&errors[1].error, FormError::InvalidDefinition { reference, .. }
        if reference == "#/definitions/Broken"));

    form.field("good").unwrap().set_value("kept");
    assert_eq!(form.values(), json!({ "good": "kept" }));
}

#[test]
fn test_same_name_in_two_locations_stays_distinct() {
    let form = form_of(json!([
        { "name": "id", "in": "path", "required": true, "type": "integer" },
        { "name": "id", "in": "query", "type": "string" },
        { "name": "limit", "in": "query", "type": "integer" }
    ]));

    let ids = form.identifiers();
    assert_eq!(ids, vec!["op-path.id", "op-query.id", "op-limit"]);

    form.field("path.id").unwrap().set_value("7");
    form.field("query.id").unwrap().set_value("x");
    assert_eq!(
        form.values(),
        json!({ "path": { "id": 7 }, "query": { "id": "x" }, "limit": 0 })
    );
}
