use super::{
    MediaType, Operation, Parameter, ParameterIn, RequestBody, Response, SecurityRequirement,
    JSON_MEDIA_TYPE, SECURITY_SCHEME,
};
use crate::model::{Action, Governance};
use crate::naming;
use crate::plan::ActionPlan;
use crate::schema::{self, Schema, SchemaType};
use crate::typemap::SchemaDialect;
use indexmap::IndexMap;

const FAILURE_RESPONSES: [(&str, &str); 4] = [
    ("400", "Bad request: the parameters are missing or invalid"),
    ("401", "Unauthorized: authentication is required"),
    ("403", "Forbidden: the caller lacks the required permission tier"),
    ("404", "Not found: the target object does not exist"),
];

/// One compiled operation and the component schemas it references.
#[derive(Debug, Clone)]
pub struct BuiltOperation {
    pub operation: Operation,
    pub schemas: Vec<(String, Schema)>,
}

pub fn build_operation(plan: &ActionPlan<'_>) -> BuiltOperation {
    let action = plan.action;
    let request_name = plan.identity.request_schema();
    let response_name = plan.identity.response_schema();

    let mut schemas = Vec::new();

    let request_body = match schema::request_schema(action, SchemaDialect::OpenApi) {
        Some(request) if !plan.method.is_read() => {
            let required = !request.required.is_empty();
            schemas.push((request_name.clone(), request));
            Some(RequestBody {
                required,
                content: json_content(Schema::component_ref(&request_name)),
            })
        }
        _ => None,
    };

    schemas.push((response_name.clone(), schema::response_schema(action)));

    let mut responses = IndexMap::new();
    responses.insert(
        "200".to_string(),
        Response {
            description: "Action completed successfully".to_string(),
            content: json_content(Schema::component_ref(&response_name)),
        },
    );
    for (code, description) in FAILURE_RESPONSES {
        responses.insert(code.to_string(), Response::described(description));
    }

    let parameters = naming::path_params(&plan.path)
        .into_iter()
        .map(|name| Parameter {
            name,
            location: ParameterIn::Path,
            required: true,
            schema: Schema::of(SchemaType::String),
        })
        .collect();

    let security = match &action.governance {
        Some(gov) if gov.requires_auth() => {
            let mut requirement = SecurityRequirement::new();
            requirement.insert(SECURITY_SCHEME.to_string(), Vec::new());
            vec![requirement]
        }
        _ => Vec::new(),
    };

    let tags = if plan.object_name.is_empty() {
        Vec::new()
    } else {
        vec![plan.object_name.clone()]
    };

    BuiltOperation {
        operation: Operation {
            operation_id: plan.identity.operation_id.clone(),
            summary: action.summary().to_string(),
            description: describe(action),
            tags,
            parameters,
            request_body,
            responses,
            security,
            action_kind: action.kind.to_string(),
            governance: action.governance.clone(),
        },
        schemas,
    }
}

fn json_content(schema: Schema) -> IndexMap<String, MediaType> {
    let mut content = IndexMap::new();
    content.insert(JSON_MEDIA_TYPE.to_string(), MediaType { schema });
    content
}

/// Long-form description. Parts appear in a fixed order and absent parts are
/// skipped: description, executor, trigger, preconditions, postconditions,
/// side effects, governance.
pub fn describe(action: &Action) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();

    let description = action.description.trim();
    if !description.is_empty() {
        parts.push(description.to_string());
    }

    if let Some(business) = &action.business_layer {
        let role = business.executor_role.trim();
        if !role.is_empty() {
            parts.push(format!("Executor: {role}"));
        }
        let trigger = business.trigger_condition.trim();
        if !trigger.is_empty() {
            parts.push(format!("Trigger: {trigger}"));
        }
    }

    if let Some(logic) = &action.logic_layer {
        for (title, items) in [
            ("Preconditions", &logic.preconditions),
            ("Postconditions", &logic.postconditions),
            ("Side effects", &logic.side_effects),
        ] {
            if let Some(list) = bulleted(title, items) {
                parts.push(list);
            }
        }
    }

    if let Some(gov) = &action.governance {
        parts.push(governance_line(gov));
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n\n"))
    }
}

fn bulleted(title: &str, items: &[String]) -> Option<String> {
    let lines: Vec<String> = items
        .iter()
        .map(|i| i.trim())
        .filter(|i| !i.is_empty())
        .map(|i| format!("- {i}"))
        .collect();
    if lines.is_empty() {
        return None;
    }
    Some(format!("{title}:\n{}", lines.join("\n")))
}

fn governance_line(gov: &Governance) -> String {
    format!(
        "Governance: permission tier {}, risk {}, human approval {}, audit log {}",
        gov.permission_tier,
        gov.risk_level,
        if gov.requires_human_approval { "required" } else { "not required" },
        if gov.audit_log { "enabled" } else { "disabled" },
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
