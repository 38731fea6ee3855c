//! Built-in route declarations for the scanning console

use crate::routes::decl::{RouteDecl, RouteMetaDecl};
use crate::routes::node::Layout;

const ALL_ROLES: [&str; 4] = ["admin", "operator", "user", "viewer"];

/// Route declarations of the administration console
pub fn console_routes() -> Vec<RouteDecl> {
    vec![
        RouteDecl::new("Welcome").path("/").component("index").meta(
            RouteMetaDecl::titled("Home")
                .icon("home")
                .requires_auth(false)
                .layout(Layout::Blank)
                .order(1),
        ),
        RouteDecl::new("Login").path("/login").component("login").meta(
            RouteMetaDecl::titled("Login")
                .hidden()
                .layout(Layout::Auth),
        ),
        RouteDecl::new("Dashboard")
            .path("/dashboard")
            .component("dashboard")
            .meta(
                RouteMetaDecl::titled("Dashboard")
                    .icon("dashboard")
                    .requires_auth(true)
                    .layout(Layout::Main)
                    .permissions(["dashboard:view"])
                    .roles(ALL_ROLES)
                    .keep_alive()
                    .order(2),
            ),
        RouteDecl::new("Scan")
            .path("/scan")
            .meta(
                RouteMetaDecl::titled("Scan Management")
                    .icon("scan")
                    .requires_auth(true)
                    .layout(Layout::Main)
                    .order(3),
            )
            .children([
                RouteDecl::new("ScanList")
                    .path("/scan/list")
                    .component("scan/list")
                    .meta(
                        RouteMetaDecl::titled("Scan Tasks")
                            .requires_auth(true)
                            .permissions(["scan:view"])
                            .roles(ALL_ROLES),
                    ),
                RouteDecl::new("ScanCreate")
                    .path("/scan/create")
                    .component("scan/create")
                    .meta(
                        RouteMetaDecl::titled("New Scan")
                            .requires_auth(true)
                            .permissions(["scan:create"])
                            .roles(["admin", "operator", "user"]),
                    ),
            ]),
        RouteDecl::new("Report")
            .path("/report")
            .meta(
                RouteMetaDecl::titled("Reports")
                    .icon("file-text")
                    .requires_auth(true)
                    .layout(Layout::Main)
                    .order(4),
            )
            .children([RouteDecl::new("ReportList")
                .path("/report/list")
                .component("report/list")
                .meta(
                    RouteMetaDecl::titled("Report List")
                        .requires_auth(true)
                        .permissions(["report:view"])
                        .roles(ALL_ROLES),
                )]),
        RouteDecl::new("System")
            .path("/system")
            .meta(
                RouteMetaDecl::titled("System")
                    .icon("setting")
                    .requires_auth(true)
                    .layout(Layout::Main)
                    .roles(["admin"])
                    .order(5),
            )
            .children([
                RouteDecl::new("UserManagement")
                    .path("/system/users")
                    .component("system/users")
                    .meta(
                        RouteMetaDecl::titled("Users")
                            .requires_auth(true)
                            .permissions(["user:view"])
                            .roles(["admin"]),
                    ),
                RouteDecl::new("SystemSettings")
                    .path("/system/settings")
                    .component("system/settings")
                    .meta(
                        RouteMetaDecl::titled("Settings")
                            .requires_auth(true)
                            .permissions(["system:manage"])
                            .roles(["admin"]),
                    ),
            ]),
        RouteDecl::new("Errors")
            .meta(RouteMetaDecl::titled("Errors").hidden())
            .children([
                error_page("403", "/403", "Forbidden"),
                error_page("404", "/404", "Not Found"),
                error_page("500", "/500", "Server Error"),
            ]),
    ]
}

fn error_page(name: &str, path: &str, title: &str) -> RouteDecl {
    RouteDecl::new(name).path(path).component(name).meta(
        RouteMetaDecl::titled(title)
            .hidden()
            .layout(Layout::Blank),
    )
}
