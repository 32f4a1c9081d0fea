//! Static route table

/// A navigable view of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Route {
    #[default]
    Home,
    SignIn,
    SignUp,
    IdRequest,
    Ticket,
    Contact,
    /// Placeholder for paths that have no view yet
    InProgress,
}

/// One entry of the route table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteEntry {
    pub path: &'static str,
    pub route: Route,
    /// Whether the view is wrapped in an auth gate
    pub gated: bool,
}

pub const ROUTES: &[RouteEntry] = &[
    RouteEntry {
        path: "/",
        route: Route::Home,
        gated: false,
    },
    RouteEntry {
        path: "/login",
        route: Route::SignIn,
        gated: false,
    },
    RouteEntry {
        path: "/signup",
        route: Route::SignUp,
        gated: false,
    },
    RouteEntry {
        path: "/ID",
        route: Route::IdRequest,
        gated: false,
    },
    RouteEntry {
        path: "/ticketing",
        route: Route::Ticket,
        gated: true,
    },
    RouteEntry {
        path: "/contact",
        route: Route::Contact,
        gated: false,
    },
    RouteEntry {
        path: "/in-progress",
        route: Route::InProgress,
        gated: false,
    },
];

/// Where unauthenticated visitors of gated routes are sent
pub const ENTRY_ROUTE: Route = Route::Home;

impl Route {
    /// Resolve a path; unknown paths land on the in-progress page
    pub fn resolve(path: &str) -> Route {
        ROUTES
            .iter()
            .find(|entry| entry.path == path)
            .map(|entry| entry.route)
            .unwrap_or(Route::InProgress)
    }

    fn entry(self) -> &'static RouteEntry {
        ROUTES
            .iter()
            .find(|entry| entry.route == self)
            .unwrap_or(&ROUTES[0])
    }

    pub fn path(self) -> &'static str {
        self.entry().path
    }

    pub fn is_gated(self) -> bool {
        self.entry().gated
    }

    pub fn title(self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::SignIn => "Sign in",
            Route::SignUp => "Create an Account",
            Route::IdRequest => "Employee Information Form",
            Route::Ticket => "Support Ticket",
            Route::Contact => "Contact Us",
            Route::InProgress => "Page in Progress",
        }
    }

    /// Views where typed characters go into form fields
    pub fn is_form_view(self) -> bool {
        matches!(
            self,
            Route::SignIn | Route::SignUp | Route::IdRequest | Route::Ticket | Route::Contact
        )
    }
}
