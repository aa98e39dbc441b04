//! Navbar Visibility Entry Point

mod config;
mod dom;
mod test_api;

pub fn main() {
    let navbar_config = config::load_navbar_config();

    match dom::attach_to_document(&navbar_config) {
        Ok(Some(controller)) => {
            zoon::println!(
                "🧭 Navbar visibility attached to #{} with {} trigger section(s)",
                navbar_config.dom.navbar_id,
                controller.sections().len()
            );
            test_api::store_controller(controller);
            test_api::expose_navbar_test_api();
        }
        // Bar or sections missing: nothing to drive on this page
        Ok(None) => {}
        Err(error) => zoon::eprintln!("🚨 Navbar visibility wiring failed: {error}"),
    }
}
