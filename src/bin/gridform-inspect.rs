use gridform::{
    parse_config, parse_form, FormError, FormRenderer, GroupEntry, Markup, PassMode, RenderGroup,
    RenderPass, RendererConfig, TemplateParams,
};
use serde::Serialize;
use std::env;
use std::fs;
use std::process;

/// What gets printed: the layout parameters, the resolved named groups and
/// the container tree, with controls shown by path.
#[derive(Serialize)]
struct Report {
    layout: TemplateParams,
    groups: Vec<GroupView>,
    tree: GroupView,
}

#[derive(Serialize)]
struct GroupView {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    level: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    controls: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    groups: Vec<GroupView>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: gridform-inspect <form.yaml> [config.yaml]");
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  gridform-inspect signup.yaml");
        eprintln!("  gridform-inspect signup.yaml renderer.yaml");
        process::exit(1);
    }

    match inspect(&args[1], args.get(2).map(String::as_str)) {
        Ok(output) => print!("{}", output),
        Err(e) => {
            eprintln!("✗ {} could not be resolved:", args[1]);
            print_error(&e);
            process::exit(1);
        }
    }
}

fn inspect(form_path: &str, config_path: Option<&str>) -> Result<String, FormError> {
    let config = match config_path {
        Some(path) => parse_config(&read(path)?)?,
        None => RendererConfig::default(),
    };
    let mut form = parse_form(&read(form_path)?)?;

    let renderer = FormRenderer::new(config)?;
    let pass = renderer.begin(&mut form, PassMode::Reset);
    let groups = pass.find_groups()?;
    let tree = pass.group_tree(None, 0);

    let report = Report {
        layout: pass.layout(),
        groups: groups.iter().map(|g| view(&pass, g)).collect(),
        tree: view(&pass, &tree),
    };
    Ok(serde_yaml::to_string(&report)?)
}

fn read(path: &str) -> Result<String, FormError> {
    fs::read_to_string(path).map_err(|e| FormError::IoError {
        path: path.to_string(),
        reason: e.to_string(),
    })
}

fn view(pass: &RenderPass<'_, '_>, group: &RenderGroup) -> GroupView {
    let mut controls = Vec::new();
    let mut groups = Vec::new();
    for entry in &group.entries {
        match entry {
            GroupEntry::Control(id) => controls.push(pass.control(*id).path.clone()),
            GroupEntry::Group(nested) => groups.push(view(pass, nested)),
        }
    }

    GroupView {
        name: group.name().to_string(),
        label: group.label.as_ref().map(Markup::as_plain_text),
        level: group.level,
        controls,
        groups,
    }
}

fn print_error(error: &FormError) {
    match error {
        FormError::GroupNotFound { name } => {
            eprintln!("  Prioritized group '{}' is not declared by the form", name);
        }
        FormError::InvalidConfiguration { reason } => {
            eprintln!("  Invalid renderer configuration:");
            eprintln!("    {}", reason);
        }
        FormError::UnknownControl { group, path } => {
            eprintln!("  Group '{}' references unknown control '{}'", group, path);
        }
        FormError::IoError { path, reason } => {
            eprintln!("  Could not read '{}':", path);
            eprintln!("    {}", reason);
        }
        FormError::YamlError(msg) => {
            eprintln!("  YAML error:");
            eprintln!("    {}", msg);
        }
        e => {
            eprintln!("  {}", e);
        }
    }
}
