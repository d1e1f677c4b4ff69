//! show / validate 命令

use anyhow::Result;
use colored::Colorize;
use std::path::Path;

pub fn show(file: &Path, format: &str) -> Result<()> {
    let set = super::load_set(file)?;

    match format.to_lowercase().as_str() {
        "tree" => println!("{}", set),
        "json" => println!("{}", set.to_json()?),
        "yaml" | "yml" => print!("{}", set.to_yaml()?),
        "xml" => println!("{}", set.to_xml()?),
        other => anyhow::bail!("不支持的输出格式: {}，仅支持 tree/json/yaml/xml", other),
    }
    super::print_warnings(&set);
    Ok(())
}

pub fn validate(file: &Path) -> Result<()> {
    let set = super::load_set(file)?;

    println!(
        "{} 测试集配置有效: {} ({} 个用例, {} 个步骤)",
        "✓".green().bold(),
        set.name.cyan(),
        set.cases.len(),
        set.step_count()
    );
    super::print_warnings(&set);
    Ok(())
}
