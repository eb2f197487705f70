use activator::prelude::*;
use std::cell::RefCell;

thread_local! {
    static CALLS: RefCell<Vec<&'static str>> = const { RefCell::new(Vec::new()) };
}

fn record(name: &'static str) {
    CALLS.with(|calls| calls.borrow_mut().push(name));
}

fn take_calls() -> Vec<&'static str> {
    CALLS.with(|calls| std::mem::take(&mut *calls.borrow_mut()))
}

pub struct Bootstrap;

#[activatable]
impl Bootstrap {
    fn init() {
        record("init");
    }

    pub fn boot() -> anyhow::Result<()> {
        record("boot");
        Ok(())
    }

    fn late() -> std::result::Result<(), std::io::Error> {
        record("late");
        Ok(())
    }

    fn fail() -> anyhow::Result<()> {
        anyhow::bail!("disk full")
    }

    fn teardown() {
        record("teardown");
    }

    #[allow(dead_code)]
    fn scale(value: u32) -> u32 {
        value * 2
    }

    #[allow(dead_code)]
    fn new() -> Self {
        Bootstrap
    }
}

pub struct Settings;

#[activatable]
impl Settings {
    fn load() -> anyhow::Result<()> {
        let port = Self::port()?;
        record(if port == 8080 { "settings" } else { "settings-other" });
        Ok(())
    }

    fn port() -> std::result::Result<u32, std::num::ParseIntError> {
        "8080".parse()
    }

    #[allow(dead_code)]
    fn label() -> Result<String> {
        Ok("settings".to_string())
    }
}

pub struct Legacy;

#[activatable(name = "Company.Legacy")]
impl Legacy {
    fn start() {
        record("legacy");
    }
}

#[activation_module(startup = [Bootstrap::boot(order = 5)])]
pub struct ModuleA;

#[activation_module(startup = [Bootstrap::init(order = 1)])]
pub struct ModuleB;

#[activation_module(startup = [Bootstrap::late], exit = [Bootstrap::teardown])]
pub struct ModuleC;

#[activation_module(
    startup = [
        Bootstrap::init(order = 1),
        Bootstrap::vanished(order = 2),
        Bootstrap::boot(order = 3),
    ],
)]
pub struct ModuleD;

#[activation_module(
    startup = [Bootstrap::init(order = 1), Bootstrap::fail(order = 2), Bootstrap::boot(order = 3)]
)]
pub struct FailingModule;

#[activation_module(
    name = "legacy",
    file = "Company.Legacy.dll",
    startup = [Legacy::start(order = -10)],
)]
pub struct LegacyModule;

fn registry() -> Arc<TypeRegistry> {
    let registry = Arc::new(TypeRegistry::new());
    registry.register::<Bootstrap>();
    registry.register::<Legacy>();
    registry
}

fn dispatcher(catalog: Arc<ModuleCatalog>) -> ActivationDispatcher {
    ActivationDispatcher::new(catalog, registry())
}

#[test]
fn test_activatable_exports_only_activation_methods() {
    let mut names: Vec<_> = Bootstrap::activation_methods()
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    names.sort_unstable();

    assert_eq!(names, vec!["boot", "fail", "init", "late", "teardown"]);
    assert_eq!(Bootstrap::type_ref().as_str(), "Bootstrap");
}

#[test]
fn test_helpers_returning_values_are_not_exported() {
    let names: Vec<_> = Settings::activation_methods()
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(names, vec!["load"]);

    let registry = TypeRegistry::new();
    registry.register::<Settings>();
    take_calls();
    registry.invoke(&TypeRef::new("Settings"), "load").unwrap();
    assert_eq!(take_calls(), vec!["settings"]);
    assert!(registry.invoke(&TypeRef::new("Settings"), "port").unwrap_err().is_lookup());
}

#[test]
fn test_custom_type_name() {
    assert_eq!(TypeRef::of::<Legacy>().as_str(), "Company.Legacy");
    assert!(registry().contains(&TypeRef::new("Company.Legacy"), "start"));
}

#[test]
fn test_module_metadata() {
    assert_eq!(ModuleA.id().as_str(), "ModuleA");
    assert_eq!(ModuleA.name(), "ModuleA");
    assert_eq!(LegacyModule.id().as_str(), "legacy");
    assert_eq!(LegacyModule.name(), "Company.Legacy.dll");

    let markers = ModuleC.markers().unwrap();
    assert_eq!(markers.len(), 2);
    assert_eq!(markers[0].phase(), Phase::Startup);
    assert_eq!(markers[0].order(), DEFAULT_ORDER);
    assert_eq!(markers[1].phase(), Phase::Exit);
    assert_eq!(markers[1].method_name(), "teardown");

    let legacy = LegacyModule.markers().unwrap();
    assert_eq!(legacy[0].order(), -10);
    assert_eq!(legacy[0].target_type().as_str(), "Company.Legacy");
}

#[test]
fn test_declared_order_wins_over_module_order() {
    take_calls();
    let catalog = Arc::new(ModuleCatalog::new());
    catalog.add_module(ModuleA);
    catalog.add_module(ModuleB);
    catalog.add_module(ModuleC);

    let summary = dispatcher(catalog).run_startup().unwrap();

    assert_eq!(take_calls(), vec!["init", "boot", "late"]);
    assert_eq!(summary.invoked, 3);
}

#[test]
fn test_exit_phase_runs_exit_markers_only() {
    take_calls();
    let catalog = Arc::new(ModuleCatalog::new());
    catalog.add_module(ModuleC);

    dispatcher(catalog).run_exit().unwrap();

    assert_eq!(take_calls(), vec!["teardown"]);
}

#[test]
fn test_negative_order_runs_first() {
    take_calls();
    let catalog = Arc::new(ModuleCatalog::new());
    catalog.add_module(ModuleB);
    catalog.add_module(LegacyModule);

    dispatcher(catalog).run_startup().unwrap();

    assert_eq!(take_calls(), vec!["legacy", "init"]);
}

#[test]
fn test_missing_method_stops_the_run() {
    take_calls();
    let catalog = Arc::new(ModuleCatalog::new());
    catalog.add_module(ModuleD);

    let err = dispatcher(catalog).run_startup().unwrap_err();

    assert_eq!(
        err.to_string(),
        "The type Bootstrap does not have a static method named vanished"
    );
    assert_eq!(take_calls(), vec!["init"]);
}

#[test]
fn test_failing_method_error_propagates() {
    take_calls();
    let catalog = Arc::new(ModuleCatalog::new());
    catalog.add_module(FailingModule);

    let err = dispatcher(catalog).run_startup().unwrap_err();

    match err {
        ActivationError::Invocation { method, source, .. } => {
            assert_eq!(method, "fail");
            assert_eq!(source.to_string(), "disk full");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(take_calls(), vec!["init"]);
}
