use mcpgen_core::catalog::{self, OperationCatalog, ParamType};
use mcpgen_core::config::NamingConfig;
use mcpgen_core::ir::GenerationInput;
use mcpgen_core::parse;
use mcpgen_core::transform;

const PETSTORE: &str = include_str!("fixtures/petstore.yaml");
const SECURED: &str = include_str!("fixtures/secured.json");
const CATALOG: &str = include_str!("fixtures/catalog.yaml");

fn petstore_input() -> GenerationInput {
    let spec = parse::from_str(PETSTORE).expect("petstore should parse");
    let catalog = catalog::derive(&spec).expect("petstore catalog");
    GenerationInput::new(&spec, catalog)
}

#[test]
fn derive_petstore_groups() {
    let input = petstore_input();
    let ids: Vec<String> = input
        .catalog
        .api_groups()
        .iter()
        .map(|g| g.api_var_name())
        .collect();
    assert_eq!(ids, vec!["pet_api", "store_api", "user_api"]);
}

#[test]
fn derive_petstore_request_bodies() {
    let input = petstore_input();
    let pet = input.catalog.group("pet_api").unwrap();

    let add = pet.method("add_pet").expect("add_pet");
    assert_eq!(add.params[0].name, "pet");
    assert_eq!(add.params[0].ty.model_name(), Some("Pet"));
    assert!(!add.params[0].has_default);

    // Optional body stays optional.
    let store = input.catalog.group("store_api").unwrap();
    let place = store.method("place_order").unwrap();
    assert_eq!(place.params[0].name, "order");
    assert!(place.params[0].has_default);
}

#[test]
fn derive_petstore_models() {
    let input = petstore_input();
    let pet = input.catalog.model("Pet").expect("Pet model");
    let names: Vec<&str> = pet.fields.iter().map(|f| f.wire_name()).collect();
    assert_eq!(names, vec!["id", "name", "category", "photoUrls", "status"]);
    assert_eq!(
        pet.fields[2].ty,
        ParamType::Model {
            name: "Category".to_string()
        }
    );
    assert_eq!(pet.fields[3].ty, ParamType::array_of(ParamType::String));
    assert!(pet.fields[1].required);
}

#[test]
fn petstore_tools_per_group() {
    let input = petstore_input();
    let naming = NamingConfig::default();
    let mut tool_names = Vec::new();
    for group in input.catalog.api_groups() {
        let specs = transform::build_group(
            group,
            &input.catalog,
            input.endpoints_for(&group.api_var_name()),
            &naming,
        )
        .expect("petstore names are valid");
        tool_names.push(
            specs
                .tools
                .iter()
                .map(|t| t.tool_name.clone())
                .collect::<Vec<_>>(),
        );
    }
    assert_eq!(
        tool_names,
        vec![
            vec![
                "add_pet",
                "delete_pet",
                "find_pets_by_status",
                "get_pet_by_id",
                "update_pet",
                "update_pet_with_form",
            ],
            vec![
                "delete_order",
                "list_inventory",
                "get_order_by_id",
                "place_order"
            ],
            vec!["create_user", "get_user_by_name", "login_user"],
        ]
    );
}

#[test]
fn petstore_resources_per_group() {
    let input = petstore_input();
    let naming = NamingConfig::default();
    let uris = |group_id: &str| -> Vec<String> {
        let group = input.catalog.group(group_id).unwrap();
        transform::build_group(group, &input.catalog, input.endpoints_for(group_id), &naming)
            .unwrap()
            .resources
            .into_iter()
            .map(|r| r.uri_template)
            .collect()
    };
    assert_eq!(
        uris("pet_api"),
        vec!["findbystatus://pet/findByStatus{?status}", "pet://pet/{pet_id}"]
    );
    // /store/inventory has no parameters and is rejected.
    assert_eq!(uris("store_api"), vec!["order://store/order/{order_id}"]);
    assert_eq!(
        uris("user_api"),
        vec!["login://user/login{?username,password}", "user://user/{username}"]
    );
}

#[test]
fn manifest_catalog_drives_tools() {
    let catalog = OperationCatalog::from_str(CATALOG).expect("manifest should load");
    let groups = catalog.api_groups();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].api_var_name(), "healthcare_users_api");

    let mut naming = NamingConfig::default();
    naming
        .overrides
        .insert("legacyOp".to_string(), "custom_tool".to_string());
    let specs = transform::build_group(groups[0], &catalog, &[], &naming).unwrap();
    let names: Vec<&str> = specs.tools.iter().map(|t| t.tool_name.as_str()).collect();
    assert_eq!(
        names,
        vec!["list_healthcare_users", "custom_tool", "create_healthcare_user"]
    );

    let create = &specs.tools[2];
    assert!(create.has_model_params);
    assert_eq!(
        create.parameters[0].example_json.as_deref(),
        Some("{\n  \"displayName\": \"Example Name\",\n  \"isAdmin\": false\n}")
    );
}

#[test]
fn secured_json_catalog_and_resources() {
    let spec = parse::from_str(SECURED).expect("json document should parse");
    let catalog = catalog::derive(&spec).unwrap();
    let input = GenerationInput::new(&spec, catalog);
    let groups: Vec<&str> = input
        .resource_endpoints
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(groups, vec!["patients_api", "system_api"]);

    let naming = NamingConfig::default();
    let patients = input.catalog.group("patients_api").unwrap();
    let specs =
        transform::build_group(patients, &input.catalog, input.endpoints_for("patients_api"), &naming)
            .unwrap();
    let uris: Vec<&str> = specs
        .resources
        .iter()
        .map(|r| r.uri_template.as_str())
        .collect();
    assert_eq!(
        uris,
        vec!["patients://patients{?limit,ward}", "patients://patients/{patient_id}"]
    );

    let system = input.catalog.group("system_api").unwrap();
    let specs =
        transform::build_group(system, &input.catalog, input.endpoints_for("system_api"), &naming)
            .unwrap();
    assert!(specs.resources.is_empty());
    assert_eq!(specs.tools[0].tool_name, "list_health");
}
