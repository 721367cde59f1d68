//! Backend API: Express (TypeScript) and FastAPI (Python).
//!
//! Both share one layout, `src/{controllers,models,routes,middleware,utils,config}`
//! plus a dependency manifest at the root. Endpoints are grouped by resource
//! into one route module and one controller each.

use serde_json::json;

use super::{GenerationContext, PlatformGenerator, Requirement, Step};
use crate::{
    domain::{FileSet, Target},
    error::ForgeResult,
};

const BACKEND_SKELETON: &[&str] = &[
    "src/controllers",
    "src/models",
    "src/routes",
    "src/middleware",
    "src/utils",
    "src/config",
];

const NODE_GITIGNORE: &str = "\
node_modules/
dist/
.env
*.log
coverage/
.DS_Store
";

const PYTHON_GITIGNORE: &str = "\
__pycache__/
*.py[cod]
.venv/
venv/
.env
.pytest_cache/
dist/
*.egg-info/
.DS_Store
";

// ============================================================================
// Express
// ============================================================================

pub struct ExpressGenerator;

impl PlatformGenerator for ExpressGenerator {
    fn target(&self) -> Target {
        Target::BackendExpress
    }

    fn skeleton(&self) -> &'static [&'static str] {
        BACKEND_SKELETON
    }

    fn steps(&self) -> Vec<Step> {
        vec![
            Step::new("manifest", Requirement::Always, express_manifest),
            Step::new("entry-point", Requirement::Always, express_entry_point),
            Step::new("data-models", Requirement::Schema, express_models),
            Step::new("routes", Requirement::Endpoints, express_routes),
            Step::new("project-files", Requirement::Always, express_project_files),
        ]
    }
}

fn express_manifest(ctx: &GenerationContext<'_>) -> ForgeResult<FileSet> {
    Ok(FileSet::new()
        .with(ctx.render_project("express/package.json", "package.json")?)
        .with(ctx.render_project("express/tsconfig.json", "tsconfig.json")?)
        .with(ctx.render_project("express/env.example", ".env.example")?))
}

fn express_entry_point(ctx: &GenerationContext<'_>) -> ForgeResult<FileSet> {
    Ok(FileSet::new()
        .with(ctx.render_project("express/index.ts", "src/index.ts")?)
        .with(ctx.render_project("express/config.ts", "src/config/index.ts")?)
        .with(ctx.render_project(
            "express/errorHandler.ts",
            "src/middleware/errorHandler.ts",
        )?)
        .with(ctx.render_project("express/logger.ts", "src/utils/logger.ts")?))
}

fn express_models(ctx: &GenerationContext<'_>) -> ForgeResult<FileSet> {
    let mut files = FileSet::new();
    for model in &ctx.project().models {
        files.push(ctx.render(
            "typescript/model.ts",
            format!("src/models/{}.ts", model.name),
            json!({ "model": model }),
        )?);
    }
    files.push(ctx.render_project("typescript/models-index.ts", "src/models/index.ts")?);
    Ok(files)
}

fn express_routes(ctx: &GenerationContext<'_>) -> ForgeResult<FileSet> {
    let mut files = FileSet::new();
    for resource in &ctx.project().resources {
        files.push(ctx.render(
            "express/routes.ts",
            format!("src/routes/{}Routes.ts", resource.name),
            json!({ "resource": resource }),
        )?);
        files.push(ctx.render(
            "express/controller.ts",
            format!("src/controllers/{}Controller.ts", resource.name),
            json!({ "resource": resource }),
        )?);
    }
    files.push(ctx.render_project("express/routes-index.ts", "src/routes/index.ts")?);
    Ok(files)
}

fn express_project_files(ctx: &GenerationContext<'_>) -> ForgeResult<FileSet> {
    Ok(FileSet::new()
        .with(ctx.verbatim(".gitignore", NODE_GITIGNORE)?)
        .with(ctx.render(
            "common/README.md",
            "README.md",
            json!({
                "platform": "Express (TypeScript)",
                "run": ["npm install", "npm run dev"],
            }),
        )?))
}

// ============================================================================
// FastAPI
// ============================================================================

pub struct FastApiGenerator;

impl PlatformGenerator for FastApiGenerator {
    fn target(&self) -> Target {
        Target::BackendFastapi
    }

    fn skeleton(&self) -> &'static [&'static str] {
        BACKEND_SKELETON
    }

    fn steps(&self) -> Vec<Step> {
        vec![
            Step::new("manifest", Requirement::Always, fastapi_manifest),
            Step::new("entry-point", Requirement::Always, fastapi_entry_point),
            Step::new("data-models", Requirement::Schema, fastapi_models),
            Step::new("routes", Requirement::Endpoints, fastapi_routes),
            Step::new("project-files", Requirement::Always, fastapi_project_files),
        ]
    }
}

fn fastapi_manifest(ctx: &GenerationContext<'_>) -> ForgeResult<FileSet> {
    Ok(FileSet::new()
        .with(ctx.render_project("fastapi/requirements.txt", "requirements.txt")?)
        .with(ctx.render_project("fastapi/pyproject.toml", "pyproject.toml")?)
        .with(ctx.render_project("fastapi/env.example", ".env.example")?))
}

fn fastapi_entry_point(ctx: &GenerationContext<'_>) -> ForgeResult<FileSet> {
    let mut files = FileSet::new()
        .with(ctx.verbatim("src/__init__.py", "")?)
        .with(ctx.render_project("fastapi/main.py", "src/main.py")?)
        .with(ctx.render_project("fastapi/settings.py", "src/config/settings.py")?)
        .with(ctx.render_project(
            "fastapi/error_handler.py",
            "src/middleware/error_handler.py",
        )?)
        .with(ctx.render_project("fastapi/logger.py", "src/utils/logger.py")?);
    for package in BACKEND_SKELETON {
        files.push(ctx.verbatim(format!("{package}/__init__.py"), "")?);
    }
    Ok(files)
}

fn fastapi_models(ctx: &GenerationContext<'_>) -> ForgeResult<FileSet> {
    let mut files = FileSet::new();
    for model in &ctx.project().models {
        files.push(ctx.render(
            "fastapi/model.py",
            format!("src/models/{}.py", model.name),
            json!({ "model": model }),
        )?);
    }
    Ok(files)
}

fn fastapi_routes(ctx: &GenerationContext<'_>) -> ForgeResult<FileSet> {
    let mut files = FileSet::new();
    for resource in &ctx.project().resources {
        files.push(ctx.render(
            "fastapi/routes.py",
            format!("src/routes/{}.py", resource.snake),
            json!({ "resource": resource }),
        )?);
        files.push(ctx.render(
            "fastapi/controller.py",
            format!("src/controllers/{}_controller.py", resource.snake),
            json!({ "resource": resource }),
        )?);
    }
    Ok(files)
}

fn fastapi_project_files(ctx: &GenerationContext<'_>) -> ForgeResult<FileSet> {
    Ok(FileSet::new()
        .with(ctx.verbatim(".gitignore", PYTHON_GITIGNORE)?)
        .with(ctx.render(
            "common/README.md",
            "README.md",
            json!({
                "platform": "FastAPI (Python)",
                "run": [
                    "pip install -r requirements.txt",
                    "uvicorn src.main:app --reload",
                ],
            }),
        )?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::generators::tests::echo_registry;
    use crate::domain::{DescriptorDocument, ProjectDescriptor};

    fn descriptor(value: serde_json::Value) -> ProjectDescriptor {
        let doc: DescriptorDocument = serde_json::from_value(value).unwrap();
        ProjectDescriptor::from_document(doc).unwrap()
    }

    #[test]
    fn express_emits_one_route_module_per_resource() {
        let registry = echo_registry();
        let d = descriptor(serde_json::json!({
            "name": "Acme",
            "target": "backend-express",
            "apiEndpoints": [
                { "path": "/api/users", "method": "GET" },
                { "path": "/api/users/{id}", "method": "GET" },
                { "path": "/api/orders", "method": "POST" }
            ]
        }));
        let files = ExpressGenerator
            .generate(&GenerationContext::new(&d, &registry, "/tmp/unused"))
            .unwrap();
        let paths = files.path_set();
        assert!(paths.contains("package.json"));
        assert!(paths.contains("src/routes/usersRoutes.ts"));
        assert!(paths.contains("src/routes/ordersRoutes.ts"));
        assert!(paths.contains("src/controllers/usersController.ts"));
        assert!(paths.contains("src/routes/index.ts"));
        assert!(!paths.iter().any(|p| p.starts_with("src/models/")));
    }

    #[test]
    fn fastapi_models_are_pascal_named() {
        let registry = echo_registry();
        let d = descriptor(serde_json::json!({
            "name": "Acme",
            "target": "backend-fastapi",
            "databaseSchema": { "tables": [
                { "name": "order_item", "columns": [{ "name": "unit_price", "type": "decimal" }] },
                { "name": "audit_log" }
            ]}
        }));
        let files = FastApiGenerator
            .generate(&GenerationContext::new(&d, &registry, "/tmp/unused"))
            .unwrap();
        let paths = files.path_set();
        assert!(paths.contains("src/models/OrderItem.py"));
        assert!(paths.contains("src/models/AuditLog.py"));
        assert!(paths.contains("src/models/__init__.py"));
        assert!(paths.contains("requirements.txt"));
        assert!(!paths.iter().any(|p| p.starts_with("src/routes/") && p != "src/routes/__init__.py"));
    }
}
