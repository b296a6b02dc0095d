//! Build script to embed Windows resource metadata into the launcher executable
//! This sets the application name shown in Task Manager

fn main() {
    #[cfg(windows)]
    {
        let mut res = winresource::WindowsResource::new();

        res.set("ProductName", "Project Carousel");
        res.set("FileDescription", "Project Carousel Kiosk Launcher");
        res.set("InternalName", "ProjectCarousel");
        res.set("OriginalFilename", "project_carousel.exe");
        res.set("ProductVersion", env!("CARGO_PKG_VERSION"));
        res.set("FileVersion", env!("CARGO_PKG_VERSION"));

        if let Err(e) = res.compile() {
            eprintln!("Warning: Failed to compile Windows resources: {}", e);
        }
    }
}
