//! Android capability host using JNI.
//!
//! The declared capability list is read from the manifest through
//! `PackageManager.getPackageInfo(..., GET_PERMISSIONS)`, consent state via
//! `Activity.checkSelfPermission`, and requests via
//! `Activity.requestPermissions`. The response callback cannot be delivered
//! to Rust by the framework directly: the application must forward
//! `Activity.onRequestPermissionsResult` to [`deliver_consent_result`].

use std::fmt;
use std::sync::OnceLock;

use async_channel::{Receiver, Sender};
use jni::objects::{GlobalRef, JClass, JObject, JObjectArray, JString, JValue};
use jni::sys::jint;
use jni::{JNIEnv, JavaVM};

use crate::{CapabilityHost, ConsentStatus, Error};

/// `PackageManager.GET_PERMISSIONS`.
const GET_PERMISSIONS: jint = 0x0000_1000;

/// `PackageManager.PERMISSION_GRANTED`.
const PERMISSION_GRANTED: jint = 0;

/// Runtime permissions arrived with Android 6.0 (API 23).
const RUNTIME_PERMISSION_SDK: i32 = 23;

static RESPONSES: OnceLock<(Sender<u32>, Receiver<u32>)> = OnceLock::new();

fn responses() -> &'static (Sender<u32>, Receiver<u32>) {
    RESPONSES.get_or_init(async_channel::unbounded)
}

/// Deliver a consent response callback to the running splash session.
///
/// Call this from the JNI binding for `Activity.onRequestPermissionsResult`,
/// passing the `requestCode` the callback received. The grant results array
/// is deliberately not taken: the session re-reconciles against live consent
/// state instead of trusting the callback payload.
pub fn deliver_consent_result(request_id: u32) {
    // Unbounded channel: send_blocking never actually blocks.
    let _ = responses().0.send_blocking(request_id);
}

/// [`CapabilityHost`] backed by an Android `Activity`.
pub struct AndroidHost {
    vm: JavaVM,
    activity: GlobalRef,
    responses: Receiver<u32>,
}

impl fmt::Debug for AndroidHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AndroidHost").finish_non_exhaustive()
    }
}

impl AndroidHost {
    /// Create a host bound to `activity`.
    ///
    /// # Errors
    /// Returns [`Error::Platform`] if the JVM reference cannot be obtained
    /// or the activity cannot be pinned.
    pub fn new(env: &JNIEnv<'_>, activity: &JObject<'_>) -> Result<Self, Error> {
        let vm = env
            .get_java_vm()
            .map_err(|e| Error::Platform(format!("get_java_vm failed: {e}")))?;
        let activity = env
            .new_global_ref(activity)
            .map_err(|e| Error::Platform(format!("new_global_ref failed: {e}")))?;
        Ok(Self {
            vm,
            activity,
            responses: responses().1.clone(),
        })
    }

    fn with_env<T>(
        &self,
        f: impl FnOnce(&mut JNIEnv, &JObject) -> jni::errors::Result<T>,
    ) -> jni::errors::Result<T> {
        let mut env = self.vm.attach_current_thread()?;
        f(&mut env, self.activity.as_obj())
    }

    fn sdk_int(&self) -> jni::errors::Result<i32> {
        self.with_env(|env, _| {
            let version = env.find_class("android/os/Build$VERSION")?;
            env.get_static_field(version, "SDK_INT", "I")?.i()
        })
    }
}

impl CapabilityHost for AndroidHost {
    fn runtime_consent_required(&self) -> bool {
        match self.sdk_int() {
            Ok(sdk) => sdk >= RUNTIME_PERMISSION_SDK,
            Err(e) => {
                // Assume the modern model rather than skip the gate.
                log::error!("reading Build.VERSION.SDK_INT failed: {e}");
                true
            }
        }
    }

    fn declared_capabilities(&self) -> Result<Vec<String>, Error> {
        self.with_env(read_manifest_permissions)
            .map_err(|e| Error::Manifest(format!("reading manifest permissions failed: {e}")))
    }

    fn consent_status(&self, capability: &str) -> ConsentStatus {
        match self.with_env(|env, activity| check_self_permission(env, activity, capability)) {
            Ok(true) => ConsentStatus::Granted,
            Ok(false) => ConsentStatus::Denied,
            Err(e) => {
                log::error!("checkSelfPermission({capability}) failed: {e}");
                ConsentStatus::NotDetermined
            }
        }
    }

    async fn request_consent(
        &mut self,
        capabilities: &[String],
        request_id: u32,
    ) -> Result<u32, Error> {
        self.with_env(|env, activity| request_permissions(env, activity, capabilities, request_id))
            .map_err(|e| Error::Platform(format!("requestPermissions failed: {e}")))?;

        loop {
            let responded = self
                .responses
                .recv()
                .await
                .map_err(|_| Error::Interrupted)?;
            if responded == request_id {
                return Ok(responded);
            }
            log::debug!("discarding stale consent response {responded}");
        }
    }
}

/// JNI entry point for applications using the `SplashBridge` Java shim,
/// which forwards `onRequestPermissionsResult` here.
#[allow(non_snake_case)]
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_splashkit_SplashBridge_dispatchConsentResult(
    _env: JNIEnv<'_>,
    _class: JClass<'_>,
    request_code: jint,
) {
    #[allow(clippy::cast_sign_loss)]
    deliver_consent_result(request_code as u32);
}

fn read_manifest_permissions(
    env: &mut JNIEnv,
    activity: &JObject,
) -> jni::errors::Result<Vec<String>> {
    let package_manager = env
        .call_method(
            activity,
            "getPackageManager",
            "()Landroid/content/pm/PackageManager;",
            &[],
        )?
        .l()?;
    let package_name = env
        .call_method(activity, "getPackageName", "()Ljava/lang/String;", &[])?
        .l()?;
    let package_info = env
        .call_method(
            &package_manager,
            "getPackageInfo",
            "(Ljava/lang/String;I)Landroid/content/pm/PackageInfo;",
            &[
                JValue::Object(&package_name),
                JValue::Int(GET_PERMISSIONS),
            ],
        )?
        .l()?;

    let requested = env
        .get_field(&package_info, "requestedPermissions", "[Ljava/lang/String;")?
        .l()?;
    if requested.is_null() {
        // Manifest declares no permissions at all.
        return Ok(Vec::new());
    }

    let array = JObjectArray::from(requested);
    let len = env.get_array_length(&array)?;
    let mut permissions = Vec::with_capacity(len as usize);
    for i in 0..len {
        let element = env.get_object_array_element(&array, i)?;
        let jstring = JString::from(element);
        permissions.push(String::from(env.get_string(&jstring)?));
    }
    Ok(permissions)
}

fn check_self_permission(
    env: &mut JNIEnv,
    activity: &JObject,
    capability: &str,
) -> jni::errors::Result<bool> {
    let name = env.new_string(capability)?;
    let result = env
        .call_method(
            activity,
            "checkSelfPermission",
            "(Ljava/lang/String;)I",
            &[JValue::Object(&name)],
        )?
        .i()?;
    Ok(result == PERMISSION_GRANTED)
}

fn request_permissions(
    env: &mut JNIEnv,
    activity: &JObject,
    capabilities: &[String],
    request_id: u32,
) -> jni::errors::Result<()> {
    let array = env.new_object_array(
        capabilities.len() as jint,
        "java/lang/String",
        JObject::null(),
    )?;
    for (i, capability) in capabilities.iter().enumerate() {
        let name = env.new_string(capability)?;
        env.set_object_array_element(&array, i as jint, name)?;
    }
    env.call_method(
        activity,
        "requestPermissions",
        "([Ljava/lang/String;I)V",
        &[JValue::Object(&array), JValue::Int(request_id as jint)],
    )?
    .v()
}
