//! 报告生成测试

use async_trait::async_trait;
use tempfile::TempDir;

use atf_executor::{
    Action, CommandOutput, ExecContext, NullProgress, ProcessRunner, TestCase, TestResult, TestSet,
    TestStep,
};
use atf_report::{ReportFormat, ReportWriter, TestReport};

/// 命令名为 "ok" 时成功，其他命令退出码为 1
struct NameRunner;

#[async_trait]
impl ProcessRunner for NameRunner {
    async fn run(&self, command: &str, _args: &[String]) -> atf_executor::Result<CommandOutput> {
        Ok(CommandOutput {
            stdout: String::new(),
            stderr: String::new(),
            exit_code: Some(if command == "ok" { 0 } else { 1 }),
            ..Default::default()
        })
    }
}

fn step(name: &str, command: &str) -> TestStep {
    TestStep {
        name: name.to_string(),
        action: Some(Action::executable(command, Vec::<String>::new())),
        ..Default::default()
    }
}

async fn executed_set() -> TestSet {
    let mut good = TestCase::new("good", "", None, None, TestResult::Pass);
    good.append([step("s1", "ok")]);
    let mut bad = TestCase::new("bad", "", None, None, TestResult::Pass);
    bad.append([step("s1", "ok"), step("s2", "broken")]);

    let mut set = TestSet::new("report set", "", None, None, None);
    set.append([good, bad]);
    set.normalize().unwrap();
    set.execute(&ExecContext::new(&NameRunner, &NullProgress)).await;
    set
}

#[tokio::test]
async fn test_write_all_formats() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("nested").join("reports");

    let mut report = TestReport::start(executed_set().await);
    report.finish();

    let writer = ReportWriter::new(&out).with_formats([
        ReportFormat::Html,
        ReportFormat::Json,
        ReportFormat::Yaml,
        ReportFormat::Xml,
    ]);
    let written = writer.write(&report).unwrap();

    assert_eq!(
        written,
        vec![
            out.join("report.html"),
            out.join("report.json"),
            out.join("report.yaml"),
            out.join("report.xml"),
        ]
    );

    let html = std::fs::read_to_string(out.join("report.html")).unwrap();
    assert!(html.contains("<h1>Test Report: report set</h1>"));
    assert!(html.contains("class=\"failed\""));

    let json = std::fs::read_to_string(out.join("report.json")).unwrap();
    let back: TestReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back, report);

    let xml = std::fs::read_to_string(out.join("report.xml")).unwrap();
    let back = TestReport::from_xml_str(&xml).unwrap();
    assert_eq!(back.started, report.started);
    assert_eq!(back.finished, report.finished);
    let statuses: Vec<_> = back.test_set.cases.iter().map(|c| c.status).collect();
    assert_eq!(statuses, vec![TestResult::Pass, TestResult::Fail]);
    assert_eq!(back.test_set.cases[1].steps[1].status, TestResult::Fail);
}

#[tokio::test]
async fn test_summary_after_execution() {
    let report = TestReport::new(executed_set().await);
    let summary = report.summary();

    assert_eq!(summary.total, 2);
    assert_eq!(summary.pass_count, 1);
    assert_eq!(summary.fail_count, 1);
    assert!(!summary.passed());
}

#[test]
fn test_default_writer_only_html() {
    let dir = TempDir::new().unwrap();
    let report = TestReport::new(TestSet::new("empty", "", None, None, None));

    let written = ReportWriter::new(dir.path()).write(&report).unwrap();
    assert_eq!(written, vec![dir.path().join("report.html")]);
}
