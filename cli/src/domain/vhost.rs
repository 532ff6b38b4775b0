//! nginx virtual-host rendering.

/// Render the HTTP virtual-host definition for `domain`, proxying every path
/// to `http://localhost:<port>`.
///
/// Pure and total: the same input always yields the same text.
#[must_use]
pub fn render(domain: &str, port: u16) -> String {
    format!(
        "server {{
    listen 80;
    listen [::]:80;
    server_name {domain};

    location / {{
        proxy_pass http://localhost:{port};
        proxy_set_header Host $host;
        proxy_set_header X-Real-IP $remote_addr;
        proxy_set_header X-Forwarded-For $proxy_add_x_forwarded_for;
        proxy_set_header X-Forwarded-Proto $scheme;
    }}
}}
"
    )
}
