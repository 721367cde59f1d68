//! Typed template contexts.
//!
//! Every template receives `project` (a [`ProjectContext`]) plus, for
//! per-item files, one of the item contexts below. All names are
//! pre-cased here so templates only format; the case helpers remain
//! available for one-off needs.
//!
//! Optional values serialize as `null` rather than being omitted: the
//! registry runs in strict mode, where a missing key is an error but a
//! present `null` is simply falsy.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::domain::{
    ApiEndpoint, ColumnType, ComponentKind, Language, PathSegment, ProjectDescriptor, Table,
    UiComponent, case,
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectContext {
    /// Name as written in the descriptor.
    pub name: String,
    pub pascal: String,
    pub camel: String,
    pub snake: String,
    pub kebab: String,
    /// Package name / bundle identifier.
    pub identifier: String,
    /// `identifier` with `.` replaced by `/`.
    pub identifier_path: String,
    pub description: String,
    pub author: Option<String>,
    pub version: String,
    pub target: String,
    pub has_schema: bool,
    pub has_endpoints: bool,
    pub has_components: bool,
    pub models: Vec<ModelContext>,
    pub endpoints: Vec<EndpointContext>,
    pub resources: Vec<ResourceContext>,
    pub components: Vec<ComponentContext>,
}

impl ProjectContext {
    pub fn build(descriptor: &ProjectDescriptor) -> Self {
        let language = descriptor.target().language();
        let metadata = descriptor.metadata();
        let identifier = descriptor.platform_identifier_or_default();
        let model_names: Vec<String> = descriptor
            .tables()
            .iter()
            .map(|t| case::pascal(&t.name))
            .collect();

        let models = descriptor
            .tables()
            .iter()
            .map(|t| ModelContext::build(t, language))
            .collect();
        let endpoints: Vec<EndpointContext> = descriptor
            .endpoints()
            .iter()
            .map(|e| EndpointContext::build(e, language, &model_names))
            .collect();
        let resources = ResourceContext::group(&endpoints, language);
        let components = descriptor
            .components()
            .iter()
            .map(ComponentContext::build)
            .collect();

        Self {
            name: descriptor.name().to_string(),
            pascal: descriptor.product_name(),
            camel: case::camel(descriptor.name()),
            snake: case::snake(descriptor.name()),
            kebab: descriptor.slug(),
            identifier_path: identifier.replace('.', "/"),
            identifier,
            description: metadata
                .description
                .clone()
                .unwrap_or_else(|| format!("{} generated by appforge", descriptor.name())),
            author: metadata.author.clone(),
            version: metadata.version.clone().unwrap_or_else(|| "1.0.0".into()),
            target: descriptor.target().to_string(),
            has_schema: descriptor.has_schema(),
            has_endpoints: descriptor.has_endpoints(),
            has_components: descriptor.has_components(),
            models,
            endpoints,
            resources,
            components,
        }
    }
}

// ── Models ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelContext {
    pub name: String,
    pub camel: String,
    pub snake: String,
    pub kebab: String,
    pub table: String,
    pub fields: Vec<FieldContext>,
    pub has_fields: bool,
    /// Language-level imports the field types need (Python only so far).
    pub imports: Vec<String>,
}

impl ModelContext {
    pub fn build(table: &Table, language: Language) -> Self {
        let fields: Vec<FieldContext> = table
            .columns
            .iter()
            .map(|c| {
                let column_type = c.column_type();
                let base = language.type_name(&column_type).to_string();
                let type_name = if c.nullable {
                    language.optional(&base)
                } else {
                    base.clone()
                };
                FieldContext {
                    name: case::camel(&c.name),
                    snake: case::snake(&c.name),
                    column: c.name.clone(),
                    type_name,
                    base_type: base,
                    nullable: c.nullable,
                    core_data_type: column_type.core_data_attribute().to_string(),
                    json_number: matches!(
                        column_type,
                        ColumnType::Integer
                            | ColumnType::BigInt
                            | ColumnType::Float
                            | ColumnType::Decimal
                    ),
                }
            })
            .collect();

        let imports = match language {
            Language::Python => python_imports(&fields),
            _ => Vec::new(),
        };

        Self {
            name: case::pascal(&table.name),
            camel: case::camel(&table.name),
            snake: case::snake(&table.name),
            kebab: case::kebab(&table.name),
            table: table.name.clone(),
            has_fields: !fields.is_empty(),
            fields,
            imports,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldContext {
    /// `camel(column)`
    pub name: String,
    pub snake: String,
    pub column: String,
    /// Mapped type, wrapped in the optional form when nullable.
    pub type_name: String,
    pub base_type: String,
    pub nullable: bool,
    pub core_data_type: String,
    pub json_number: bool,
}

fn python_imports(fields: &[FieldContext]) -> Vec<String> {
    let mut imports = BTreeSet::new();
    for field in fields {
        let line = match field.base_type.as_str() {
            "Decimal" => "from decimal import Decimal",
            "date" => "from datetime import date",
            "datetime" => "from datetime import datetime",
            "UUID" => "from uuid import UUID",
            _ => continue,
        };
        imports.insert(line.to_string());
    }
    if fields.iter().any(|f| f.nullable) {
        imports.insert("from typing import Optional".to_string());
    }
    imports.into_iter().collect()
}

// ── Endpoints ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamContext {
    pub name: String,
    pub type_name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointContext {
    pub method: String,
    pub method_lower: String,
    pub path: String,
    /// Path in the target's routing syntax (`:id` for Express, `{id}`
    /// elsewhere).
    pub route_path: String,
    /// Path as an interpolated string expression in the target language.
    pub client_path: String,
    pub operation: String,
    pub resource: String,
    pub path_params: Vec<ParamContext>,
    pub query_params: Vec<ParamContext>,
    pub has_path_params: bool,
    pub has_query_params: bool,
    pub has_body: bool,
    pub body_type: String,
    /// Path params, then query params, then `body` when the method has one.
    pub args: Vec<ParamContext>,
    pub return_type: String,
    pub return_model: Option<String>,
    pub returns_list: bool,
    pub returns_void: bool,
}

impl EndpointContext {
    pub fn build(endpoint: &ApiEndpoint, language: Language, models: &[String]) -> Self {
        let param_name = |raw: &str| match language {
            Language::Python => case::snake(raw),
            _ => case::camel(raw),
        };
        let declared_type = |raw: &str| {
            endpoint
                .parameters
                .iter()
                .find(|p| case::camel(&p.name) == case::camel(raw))
                .map(|p| language.type_name(&ColumnType::parse(&p.type_tag)).to_string())
                .unwrap_or_else(|| language.string_type().to_string())
        };

        let path_param_names = endpoint.path_params();
        let path_params: Vec<ParamContext> = path_param_names
            .iter()
            .map(|p| ParamContext {
                name: param_name(p),
                type_name: declared_type(p),
            })
            .collect();
        let query_params: Vec<ParamContext> = endpoint
            .parameters
            .iter()
            .filter(|p| {
                !path_param_names
                    .iter()
                    .any(|pp| case::camel(pp) == case::camel(&p.name))
            })
            .map(|p| ParamContext {
                name: param_name(&p.name),
                type_name: language.type_name(&ColumnType::parse(&p.type_tag)).to_string(),
            })
            .collect();

        let resolved = resolve_return_type(endpoint.return_type.as_deref(), language, models);
        let operation = match language {
            Language::Python => case::snake(&endpoint.operation_name()),
            _ => endpoint.operation_name(),
        };
        let body_type = resolved
            .model
            .clone()
            .unwrap_or_else(|| map_type(language).to_string());
        let mut args: Vec<ParamContext> =
            path_params.iter().chain(&query_params).cloned().collect();
        if endpoint.method.has_body() {
            args.push(ParamContext {
                name: "body".to_string(),
                type_name: body_type.clone(),
            });
        }

        Self {
            method: endpoint.method.as_str().to_string(),
            method_lower: endpoint.method.as_str().to_ascii_lowercase(),
            path: endpoint.path.clone(),
            route_path: render_path(endpoint, |p| match language {
                Language::TypeScript => format!(":{}", case::camel(p)),
                Language::Python => format!("{{{}}}", case::snake(p)),
                _ => format!("{{{}}}", case::camel(p)),
            }),
            client_path: render_path(endpoint, |p| {
                let p = param_name(p);
                match language {
                    Language::TypeScript => format!("${{{p}}}"),
                    Language::Dart | Language::Kotlin => format!("${p}"),
                    Language::Swift => format!("\\({p})"),
                    Language::Python => format!("{{{p}}}"),
                }
            }),
            operation,
            resource: endpoint.resource(),
            has_path_params: !path_params.is_empty(),
            has_query_params: !query_params.is_empty(),
            path_params,
            query_params,
            has_body: endpoint.method.has_body(),
            body_type,
            args,
            return_type: resolved.type_name,
            return_model: resolved.model,
            returns_list: resolved.is_list,
            returns_void: resolved.is_void,
        }
    }
}

fn render_path(endpoint: &ApiEndpoint, param: impl Fn(&str) -> String) -> String {
    let mut out = String::new();
    for segment in endpoint.segments() {
        out.push('/');
        match segment {
            PathSegment::Static(s) => out.push_str(s),
            PathSegment::Param(p) => out.push_str(&param(p)),
        }
    }
    if out.is_empty() {
        out.push('/');
    }
    out
}

/// Untyped JSON object type, used for request bodies with no model.
fn map_type(language: Language) -> &'static str {
    match language {
        Language::Kotlin => "Map<String, Any>",
        Language::Swift => "[String: String]",
        Language::TypeScript => "Record<string, unknown>",
        Language::Dart => "Map<String, dynamic>",
        Language::Python => "dict",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    pub type_name: String,
    pub model: Option<String>,
    pub is_list: bool,
    pub is_void: bool,
}

/// Resolve an endpoint's `returnType`.
///
/// `User` and `User[]` (also `List<User>`, `[User]`) resolve to the model
/// when a table of that name exists; other names go through the column type
/// map; absent or `void` yields the language's unit type.
pub fn resolve_return_type(raw: Option<&str>, language: Language, models: &[String]) -> ResolvedType {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() || raw.eq_ignore_ascii_case("void") || raw.eq_ignore_ascii_case("none") {
        return ResolvedType {
            type_name: language.void_type().to_string(),
            model: None,
            is_list: false,
            is_void: true,
        };
    }

    let (inner, is_list) = strip_list(raw);
    let candidate = case::pascal(inner);
    let model = models.iter().find(|m| **m == candidate).cloned();
    let element = match &model {
        Some(m) => m.clone(),
        None => language.type_name(&ColumnType::parse(inner)).to_string(),
    };
    let type_name = if is_list {
        language.list_of(&element)
    } else {
        element
    };

    ResolvedType {
        type_name,
        model,
        is_list,
        is_void: false,
    }
}

fn strip_list(raw: &str) -> (&str, bool) {
    if let Some(inner) = raw.strip_suffix("[]") {
        return (inner.trim(), true);
    }
    for (open, close) in [("List<", ">"), ("Array<", ">"), ("list[", "]"), ("[", "]")] {
        if let Some(inner) = raw.strip_prefix(open).and_then(|r| r.strip_suffix(close)) {
            return (inner.trim(), true);
        }
    }
    (raw, false)
}

// ── Resources ────────────────────────────────────────────────────────────────

/// Endpoints sharing a first meaningful path segment.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContext {
    pub name: String,
    pub pascal: String,
    pub snake: String,
    pub kebab: String,
    pub endpoints: Vec<EndpointContext>,
    /// Distinct models the endpoints return or accept.
    pub models: Vec<String>,
    pub uses_list_type: bool,
}

impl ResourceContext {
    /// Group in first-appearance order.
    pub fn group(endpoints: &[EndpointContext], language: Language) -> Vec<Self> {
        let mut resources: Vec<Self> = Vec::new();
        for endpoint in endpoints {
            let idx = match resources.iter().position(|r| r.name == endpoint.resource) {
                Some(idx) => idx,
                None => {
                    resources.push(Self {
                        name: endpoint.resource.clone(),
                        pascal: case::pascal(&endpoint.resource),
                        snake: case::snake(&endpoint.resource),
                        kebab: case::kebab(&endpoint.resource),
                        endpoints: Vec::new(),
                        models: Vec::new(),
                        uses_list_type: false,
                    });
                    resources.len() - 1
                }
            };
            let resource = &mut resources[idx];
            if let Some(model) = &endpoint.return_model {
                if !resource.models.contains(model) {
                    resource.models.push(model.clone());
                }
            }
            resource.uses_list_type |= endpoint.returns_list && language == Language::Python;
            resource.endpoints.push(endpoint.clone());
        }
        resources
    }
}

// ── Components ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentContext {
    pub name: String,
    pub camel: String,
    pub snake: String,
    pub kebab: String,
    /// Space-separated title (`OrderList` → `Order List`).
    pub title: String,
    pub kind: String,
    pub is_screen: bool,
    pub is_list: bool,
    pub is_form: bool,
    pub is_detail: bool,
}

impl ComponentContext {
    pub fn build(component: &UiComponent) -> Self {
        let snake = case::snake(&component.name);
        Self {
            name: case::pascal(&component.name),
            camel: case::camel(&component.name),
            kebab: case::kebab(&component.name),
            title: snake
                .split('_')
                .filter(|s| !s.is_empty())
                .map(case::pascal)
                .collect::<Vec<_>>()
                .join(" "),
            snake,
            kind: component.kind.as_str().to_string(),
            is_screen: component.kind == ComponentKind::Screen,
            is_list: component.kind == ComponentKind::List,
            is_form: component.kind == ComponentKind::Form,
            is_detail: component.kind == ComponentKind::Detail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DescriptorDocument, HttpMethod, Parameter};
    use serde_json::json;

    fn descriptor(value: serde_json::Value) -> ProjectDescriptor {
        let doc: DescriptorDocument = serde_json::from_value(value).unwrap();
        ProjectDescriptor::from_document(doc).unwrap()
    }

    #[test]
    fn model_fields_are_camel_cased_and_mapped() {
        let project = ProjectContext::build(&descriptor(json!({
            "name": "Acme",
            "target": "backend-express",
            "databaseSchema": { "tables": [{ "name": "order_item", "columns": [
                { "name": "unit_price", "type": "decimal" },
                { "name": "shipped_at", "type": "timestamp", "nullable": true },
                { "name": "location", "type": "geography" }
            ]}]}
        })));
        let model = &project.models[0];
        assert_eq!(model.name, "OrderItem");
        assert_eq!(model.fields[0].name, "unitPrice");
        assert_eq!(model.fields[0].type_name, "number");
        assert_eq!(model.fields[1].type_name, "string | null");
        assert_eq!(model.fields[2].type_name, "string");
        assert!(model.has_fields);
    }

    #[test]
    fn python_models_collect_imports() {
        let project = ProjectContext::build(&descriptor(json!({
            "name": "Acme",
            "target": "fastapi",
            "databaseSchema": { "tables": [{ "name": "invoice", "columns": [
                { "name": "total", "type": "decimal" },
                { "name": "issued_on", "type": "date", "nullable": true }
            ]}]}
        })));
        assert_eq!(
            project.models[0].imports,
            vec![
                "from datetime import date",
                "from decimal import Decimal",
                "from typing import Optional"
            ]
        );
    }

    #[test]
    fn return_types_resolve_models_lists_and_void() {
        let models = vec!["User".to_string()];
        let list = resolve_return_type(Some("User[]"), Language::Swift, &models);
        assert_eq!(list.type_name, "[User]");
        assert_eq!(list.model.as_deref(), Some("User"));
        assert!(list.is_list);

        let scalar = resolve_return_type(Some("integer"), Language::Kotlin, &models);
        assert_eq!(scalar.type_name, "Int");
        assert!(scalar.model.is_none());

        let void = resolve_return_type(None, Language::TypeScript, &models);
        assert!(void.is_void);
        assert_eq!(void.type_name, "void");

        let generic = resolve_return_type(Some("List<user>"), Language::Dart, &models);
        assert_eq!(generic.type_name, "List<User>");
    }

    #[test]
    fn endpoint_paths_per_language() {
        let endpoint = ApiEndpoint {
            path: "/api/users/{user_id}".into(),
            method: HttpMethod::Put,
            parameters: vec![
                Parameter { name: "user_id".into(), type_tag: "int".into() },
                Parameter { name: "notify".into(), type_tag: "bool".into() },
            ],
            return_type: Some("User".into()),
        };
        let models = vec!["User".to_string()];

        let ts = EndpointContext::build(&endpoint, Language::TypeScript, &models);
        assert_eq!(ts.route_path, "/api/users/:userId");
        assert_eq!(ts.client_path, "/api/users/${userId}");
        assert_eq!(ts.path_params[0].type_name, "number");
        assert_eq!(ts.query_params.len(), 1);
        assert_eq!(ts.query_params[0].name, "notify");
        assert!(ts.has_body);
        assert_eq!(ts.body_type, "User");

        let py = EndpointContext::build(&endpoint, Language::Python, &models);
        assert_eq!(py.route_path, "/api/users/{user_id}");
        assert_eq!(py.operation, "put_users_by_user_id");

        let swift = EndpointContext::build(&endpoint, Language::Swift, &models);
        assert_eq!(swift.client_path, "/api/users/\\(userId)");
    }

    #[test]
    fn resources_group_in_first_appearance_order() {
        let project = ProjectContext::build(&descriptor(json!({
            "name": "Acme",
            "target": "express",
            "databaseSchema": { "tables": [{ "name": "user" }] },
            "apiEndpoints": [
                { "path": "/api/users", "method": "GET", "returnType": "User[]" },
                { "path": "/api/orders", "method": "GET" },
                { "path": "/api/users/{id}", "method": "DELETE" }
            ]
        })));
        let names: Vec<_> = project.resources.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["users", "orders"]);
        assert_eq!(project.resources[0].endpoints.len(), 2);
        assert_eq!(project.resources[0].models, vec!["User"]);
    }

    #[test]
    fn component_titles() {
        let ctx = ComponentContext::build(&UiComponent {
            name: "order_list".into(),
            kind: ComponentKind::List,
        });
        assert_eq!(ctx.name, "OrderList");
        assert_eq!(ctx.title, "Order List");
        assert!(ctx.is_list && !ctx.is_form);
    }

    #[test]
    fn project_defaults_fill_metadata() {
        let project = ProjectContext::build(&descriptor(json!({
            "name": "Acme Shop", "target": "android"
        })));
        assert_eq!(project.identifier, "com.example.acmeshop");
        assert_eq!(project.identifier_path, "com/example/acmeshop");
        assert_eq!(project.version, "1.0.0");
        assert!(project.description.contains("Acme Shop"));
        assert!(project.author.is_none());
    }

    #[test]
    fn args_list_path_then_query_then_body() {
        let project = ProjectContext::build(&descriptor(json!({
            "name": "Acme",
            "target": "fastapi",
            "apiEndpoints": [{
                "path": "/users/{userId}",
                "method": "PUT",
                "parameters": [{ "name": "dryRun", "type": "boolean" }]
            }]
        })));
        let args: Vec<_> = project.endpoints[0]
            .args
            .iter()
            .map(|a| (a.name.as_str(), a.type_name.as_str()))
            .collect();
        assert_eq!(
            args,
            vec![("user_id", "str"), ("dry_run", "bool"), ("body", "dict")]
        );
    }
}
