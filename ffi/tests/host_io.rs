//! Plays the C host: build requests through the FFI surface, execute them
//! with ureq against the live mock server, then normalize the outcome
//! through the FFI surface again.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use drip_ffi::types::{FfiHttpRequest, FfiResponse};
use drip_ffi::*;

fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}/v2")
}

fn read(ptr: *const c_char) -> String {
    unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_string()
}

/// Execute an `FfiHttpRequest` and hand the outcome to the normalizer, the
/// way a C host would.
fn execute(base_url: &str, req: *mut FfiHttpRequest) -> *mut FfiResponse {
    assert!(!req.is_null());
    let req_ref = unsafe { &*req };
    let url = format!("{base_url}/{}", read(req_ref.path));
    let body = read(req_ref.body);

    let headers = if req_ref.headers.is_null() {
        &[][..]
    } else {
        unsafe { std::slice::from_raw_parts(req_ref.headers, req_ref.headers_len as usize) }
    };

    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();
    let mut request = agent.post(&url).header("Authorization", "Bearer test-token");
    for h in headers {
        request = request.header(read(h.key), read(h.value));
    }

    let response = match request.send(body.as_bytes()) {
        Ok(mut resp) => {
            let status = resp.status().as_u16();
            let body = CString::new(resp.body_mut().read_to_string().unwrap_or_default()).unwrap();
            drip_normalize_response(status, body.as_ptr())
        }
        Err(err) => {
            let message = CString::new(err.to_string()).unwrap();
            drip_normalize_transport_failure(message.as_ptr())
        }
    };
    drip_free_request(req);
    response
}

#[test]
fn host_drives_all_three_operations() {
    let base_url = start_server();
    let account = CString::new("12345").unwrap();
    let builder = drip_builder_new(account.as_ptr());

    // Single order.
    let email = CString::new("drippy@drip.com").unwrap();
    let options = CString::new(r#"{"provider":"shopify","amount":4900,"currency_code":"USD"}"#).unwrap();
    let req = drip_build_create_or_update_order(builder, email.as_ptr(), options.as_ptr());
    let resp = execute(&base_url, req);
    let r = unsafe { &*resp };
    assert_eq!(r.status, 202);
    assert_eq!(read(r.body), "{}");
    drip_free_response(resp);

    // Batch.
    let orders = CString::new(
        r#"[{"email":"drippy@drip.com","amount":4900},{"email":"dripster@drip.com","amount":1500}]"#,
    )
    .unwrap();
    let req = drip_build_create_or_update_orders(builder, orders.as_ptr());
    let resp = execute(&base_url, req);
    assert_eq!(unsafe { &*resp }.status, 202);
    drip_free_response(resp);

    // Refund.
    let order_id = CString::new("98457h").unwrap();
    let req = drip_build_create_or_update_refund(builder, order_id.as_ptr(), 4900, std::ptr::null());
    let resp = execute(&base_url, req);
    assert_eq!(unsafe { &*resp }.status, 202);
    drip_free_response(resp);

    drip_builder_free(builder);
}

#[test]
fn host_reports_unreachable_server_as_status_zero() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let account = CString::new("12345").unwrap();
    let builder = drip_builder_new(account.as_ptr());
    let orders = CString::new("[]").unwrap();
    let req = drip_build_create_or_update_orders(builder, orders.as_ptr());

    let resp = execute(&format!("http://127.0.0.1:{port}/v2"), req);
    let r = unsafe { &*resp };
    assert_eq!(r.status, 0);
    assert!(read(r.body).starts_with("transport failure:"));

    drip_free_response(resp);
    drip_builder_free(builder);
}
