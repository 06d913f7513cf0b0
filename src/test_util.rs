/// FakeImplementation is a quick drop-in property that helps fake a collaborator's function and
/// capture the arguments the function is called with.
///
/// * [Args] represents the arguments passed to the function that should be captured on a call
/// * [Ret] represents the type of the function's return value
///
/// # Example
///
/// ```ignore
/// use std::sync::Mutex;
///
/// struct FakeLister {
///   // (PathBuf, String) are the captured arguments, the Result is the return value
///   listing: FakeImplementation<(PathBuf, String), Result<Vec<PathBuf>, io::ErrorKind>>,
/// }
///
/// impl FileSystem for Mutex<FakeLister> {
///   fn files_with_extension(&self, dir: &Path, extension: &str) -> io::Result<Vec<PathBuf>> {
///     // We have to lock "self" so we can mutate the interior via an immutable reference
///     let mut locked_self = self.lock().unwrap();
///     locked_self.listing.save_arguments((dir.to_path_buf(), extension.to_owned()));
///     locked_self.listing.return_value_result().map_err(io::Error::from)
///   }
/// }
/// ```
pub struct FakeImplementation<Args, Ret> {
    saved_arguments: Vec<Args>,
    return_value: Option<Ret>,
}

impl<Args, Ret> FakeImplementation<Args, Ret> {
    pub fn new() -> FakeImplementation<Args, Ret> {
        FakeImplementation {
            saved_arguments: Vec::new(),
            return_value: None,
        }
    }

    /// Saves arguments from a single invocation of the FakeImplementation
    pub fn save_arguments(&mut self, arguments: Args) {
        self.saved_arguments.push(arguments)
    }

    /// Returns the list of arguments passed on every call to this FakeImplementation
    pub fn calls(&self) -> &[Args] {
        self.saved_arguments.as_slice()
    }
}

impl<Args, Success, Fail> FakeImplementation<Args, Result<Success, Fail>>
where
    Success: Clone,
    Fail: Clone,
{
    /// Set the result that should be returned when this FakeImplementation is invoked
    pub fn set_returned_result(&mut self, return_value: Result<Success, Fail>) {
        self.return_value = Some(return_value)
    }

    /// Retrieve the result that should be returned when this FakeImplementation is invoked
    pub fn return_value_result(&self) -> Result<Success, Fail> {
        match self.return_value {
            Some(ref result) => result.clone(),
            None => panic!("Tried to return from a function where the return value wasn't set!"),
        }
    }
}
