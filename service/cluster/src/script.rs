use domain_cluster::model::vo::ScriptInfo;
use handlebars::Handlebars;
use serde_json::json;

/// Submission script skeleton: scheduler directives first, a fixed
/// environment preamble, then a single invocation of the processing entry
/// point.
const JOB_SCRIPT_TEMPLATE: &str = r#"#!/bin/bash
#SBATCH --job-name={{name}}
#SBATCH --nodes={{nodes}}
#SBATCH --ntasks-per-node={{cpus}}
{{#if mem_gb}}#SBATCH --mem={{mem_gb}}G
{{/if}}{{#if time}}#SBATCH --time={{time}}
{{/if}}#SBATCH --output={{log_dir}}/{{name}}.out
#SBATCH --error={{log_dir}}/{{name}}.err

module purge
{{#each environments}}export {{@key}}={{this}}
{{/each}}{{command}}{{#each arguments}} {{this}}{{/each}}
"#;

/// Render the submission script for one job. Pure: no side effects.
pub fn render_job_script(info: &ScriptInfo) -> anyhow::Result<String> {
    let mut renderer = Handlebars::new();
    renderer.register_escape_fn(handlebars::no_escape);
    let requirements = info.requirements.clone().unwrap_or_default();
    let data = json!({
        "name": info.name,
        "nodes": requirements.node_count.unwrap_or(1).max(1),
        "cpus": requirements.cpu_cores.unwrap_or(1).max(1),
        "mem_gb": requirements.memory_gb,
        "time": requirements.max_wall_time,
        "log_dir": info.log_dir,
        "environments": info.environments,
        "command": info.command,
        "arguments": info.arguments,
    });
    Ok(renderer.render_template(JOB_SCRIPT_TEMPLATE, &data)?)
}
