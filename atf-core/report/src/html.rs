//! HTML 报告渲染
//!
//! 生成一个 HTML5 页面：页头包含时间戳、被测系统和测试集的 setup / cleanup，
//! 之后每个用例一个 `<article>`。状态单元格带有 CSS 类
//! `passed` / `failed` / `nottested`。

use std::fmt::Write;

use atf_common::{SysUnderTest, TestResult};
use atf_executor::{Action, TestCase, TestStep};

use crate::report::TestReport;
use crate::utils::escape_html;

const STYLE: &str = "\
body { font-family: sans-serif; }
table { border-collapse: collapse; }
td, th { border: 1px solid #999; padding: 2px 8px; text-align: left; }
.passed { background-color: #8f8; }
.failed { background-color: #f88; }
.nottested { background-color: #ddd; }
";

/// 状态对应的 CSS 类
pub fn css_class(result: TestResult) -> &'static str {
    match result {
        TestResult::Pass => "passed",
        TestResult::Fail => "failed",
        TestResult::NotTested => "nottested",
        _ => "",
    }
}

/// 渲染整个报告
pub fn render(report: &TestReport) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>Test Report: {}</title>", escape_html(report.name()));
    let _ = writeln!(html, "<style>\n{}</style>", STYLE);
    html.push_str("</head>\n<body>\n");

    render_header(&mut html, report);
    for case in &report.test_set.cases {
        render_case(&mut html, case);
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_header(html: &mut String, report: &TestReport) {
    let set = &report.test_set;

    html.push_str("<header>\n");
    let _ = writeln!(html, "<h1>Test Report: {}</h1>", escape_html(&set.name));
    html.push_str("<table>\n");
    let _ = writeln!(
        html,
        "<tr><td><b>Execution Started</b></td><td>{}</td></tr>",
        escape_html(&report.started)
    );
    let _ = writeln!(
        html,
        "<tr><td><b>Execution Finished</b></td><td>{}</td></tr>",
        escape_html(&report.finished)
    );
    html.push_str("</table>\n<p />\n");

    if let Some(sut) = &set.sut {
        render_sut(html, sut);
    }

    html.push_str("<table>\n");
    if let Some(setup) = &set.setup {
        render_fixture_row(html, "Setup", setup, None);
    }
    if let Some(cleanup) = &set.cleanup {
        render_fixture_row(html, "Cleanup", cleanup, None);
    }
    html.push_str("</table>\n</header>\n");
}

fn render_sut(html: &mut String, sut: &SysUnderTest) {
    html.push_str("<table>\n");
    let _ = writeln!(
        html,
        "<tr><th>System Under Test</th><th>{}</th></tr>",
        escape_html(&sut.name)
    );
    for (label, value) in [
        ("Type", &sut.system_type),
        ("Version", &sut.version),
        ("IP Address", &sut.ip_address),
        ("Description", &sut.description),
    ] {
        let _ = writeln!(html, "<tr><td>{}</td><td>{}</td></tr>", label, escape_html(value));
    }
    html.push_str("</table>\n<p />\n");
}

/// setup / cleanup 行；用例中的 fixture 行带有期望结果列
fn render_fixture_row(html: &mut String, label: &str, action: &Action, expected: Option<&str>) {
    let _ = write!(html, "<tr><td>{}</td><td>{}</td>", label, escape_html(&action.to_string()));
    if let Some(expected) = expected {
        let _ = write!(html, "<td>{}</td>", expected);
    }
    let _ = writeln!(
        html,
        "<td class=\"{}\">{}</td></tr>",
        css_class(action.result()),
        action.result()
    );
}

fn render_case(html: &mut String, case: &TestCase) {
    html.push_str("<article>\n");
    let _ = writeln!(
        html,
        "<h3>Test Case: {} <span class=\"{}\">{}</span></h3>",
        escape_html(&case.name),
        css_class(case.status),
        case.status
    );
    html.push_str("<table>\n");
    html.push_str(
        "<tr><th class=\"name\">Name</th><th>Action</th>\
         <th class=\"status\">Expected Status</th><th class=\"status\">Status</th></tr>\n",
    );

    if let Some(setup) = &case.setup {
        render_fixture_row(html, "Setup", setup, Some("Pass"));
    }
    for step in &case.steps {
        render_step(html, step);
    }
    if let Some(cleanup) = &case.cleanup {
        render_fixture_row(html, "Cleanup", cleanup, Some("Pass"));
    }

    html.push_str("</table><p />\n</article>\n");
}

fn render_step(html: &mut String, step: &TestStep) {
    let action = step
        .action
        .as_ref()
        .map(|a| a.to_string())
        .unwrap_or_default();
    let expected = step.expected.map(|e| e.as_str()).unwrap_or("");

    let _ = writeln!(
        html,
        "<tr><td>{}</td><td>{}</td><td>{}</td><td class=\"{}\">{}</td></tr>",
        escape_html(&step.name),
        escape_html(&action),
        expected,
        css_class(step.status),
        step.status
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use atf_executor::TestSet;

    fn sample_report() -> TestReport {
        let mut case = TestCase::new("login <admin>", "", None, None, TestResult::Pass);
        case.append([
            TestStep {
                name: "type password".to_string(),
                expected: Some(TestResult::Pass),
                status: TestResult::Pass,
                action: Some(Action::executable("login.sh", ["admin", "a&b"])),
            },
            TestStep {
                name: "check banner".to_string(),
                expected: Some(TestResult::Pass),
                status: TestResult::Fail,
                action: Some(Action::executable("grep", ["welcome"])),
            },
        ]);
        case.status = TestResult::Fail;

        let sut = SysUnderTest::new("router", "HW", "1.2", "edge router", "10.0.0.1");
        let mut set = TestSet::new("smoke", "", Some(sut), Some(Action::empty()), None);
        set.append([case]);

        let mut report = TestReport::new(set);
        report.started = "2024-01-01 10:00:00".to_string();
        report.finished = "2024-01-01 10:05:00".to_string();
        report
    }

    #[test]
    fn test_css_class() {
        assert_eq!(css_class(TestResult::Pass), "passed");
        assert_eq!(css_class(TestResult::Fail), "failed");
        assert_eq!(css_class(TestResult::NotTested), "nottested");
        assert_eq!(css_class(TestResult::XFail), "");
    }

    #[test]
    fn test_render_header_and_sut() {
        let html = render(&sample_report());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h1>Test Report: smoke</h1>"));
        assert!(html.contains("<td>2024-01-01 10:05:00</td>"));
        assert!(html.contains("<tr><th>System Under Test</th><th>router</th></tr>"));
        assert!(html.contains("<tr><td>IP Address</td><td>10.0.0.1</td></tr>"));
        assert!(html.contains("<tr><td>Setup</td><td>No action</td><td class=\"nottested\">NotTested</td></tr>"));
    }

    #[test]
    fn test_render_steps_with_classes_and_escaping() {
        let html = render(&sample_report());
        assert!(html.contains("Test Case: login &lt;admin&gt;"));
        assert!(html.contains("<td>login.sh admin a&amp;b</td><td>Pass</td><td class=\"passed\">Pass</td>"));
        assert!(html.contains("<td class=\"failed\">Fail</td>"));
        assert_eq!(html.matches("<article>").count(), 1);
    }
}
